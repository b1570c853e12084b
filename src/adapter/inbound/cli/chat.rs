//! Handler for `fleetward chat`.

use serde_json::json;
use tokio::signal;

use super::command::ChatArgs;
use super::output;
use crate::error::Result;
use crate::port::inbound::{Caller, ChatRequest, FleetOperations, MessageInput};

fn request(args: &ChatArgs) -> ChatRequest {
    let mut messages = Vec::new();
    if let Some(system) = &args.system {
        messages.push(MessageInput::new("system", system.clone()));
    }
    messages.push(MessageInput::new("user", args.prompt.clone()));

    ChatRequest {
        temperature: args.temperature,
        top_p: args.top_p,
        top_k: args.top_k,
        max_length: args.max_length,
        ..ChatRequest::new(args.worker.clone(), messages)
    }
}

/// Execute `chat`: print fragments as they arrive; Ctrl-C cancels the stream.
pub async fn execute(ops: &dyn FleetOperations, caller: &Caller, args: &ChatArgs) -> Result<()> {
    let mut stream = ops.chat_completion(caller, request(args)).await?;

    let cancel = stream.cancel_token();
    let interrupt = tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let mut text = String::new();
    let mut failure = None;
    while let Some(fragment) = stream.next_fragment().await {
        match fragment {
            Ok(fragment) => {
                output::fragment(&fragment);
                text.push_str(&fragment);
            }
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }
    interrupt.abort();
    let cancelled = stream.is_cancelled();
    drop(stream);

    if !output::is_json() && !text.is_empty() {
        output::fragment("\n");
    }
    if let Some(e) = failure {
        return Err(e.into());
    }

    if output::is_json() {
        output::json_output(json!({
            "command": "chat",
            "worker": args.worker,
            "text": text,
            "cancelled": cancelled,
        }));
    } else if cancelled {
        output::warning("Generation cancelled");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ChatArgs {
        ChatArgs {
            worker: "w1".into(),
            prompt: "Hi".into(),
            system: Some("Be brief".into()),
            temperature: Some(0.3),
            top_p: None,
            top_k: Some(40),
            max_length: None,
        }
    }

    #[test]
    fn builds_system_then_user_messages() {
        let request = request(&args());
        assert_eq!(request.worker, "w1");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].content, "Hi");
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.top_k, Some(40));

        let command = request.parse().unwrap();
        assert_eq!(command.request.sampling.top_k, 40);
        assert_eq!(command.request.sampling.max_length, 2048);
    }
}
