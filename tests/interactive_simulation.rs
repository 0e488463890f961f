// tests/interactive_simulation.rs
// Drives the console and the DAP server with scripted input

use breakpoint_sources::console::Console;
use breakpoint_sources::dap::{serve, DapServer};
use serde_json::{json, Value};
use std::io::Cursor;

fn frame(msg: &Value) -> String {
    let body = msg.to_string();
    format!("Content-Length: {}\r\n\r\n{}", body.len(), body)
}

fn request(seq: u64, command: &str, arguments: Value) -> String {
    frame(&json!({
        "seq": seq,
        "type": "request",
        "command": command,
        "arguments": arguments,
    }))
}

/// Splits the server output back into JSON messages.
fn parse_output(raw: &[u8]) -> Vec<Value> {
    let text = String::from_utf8(raw.to_vec()).expect("utf-8 output");
    let mut messages = Vec::new();
    let mut rest = text.as_str();
    while let Some(header_end) = rest.find("\r\n\r\n") {
        let length: usize = rest[..header_end]
            .trim_start_matches("Content-Length:")
            .trim()
            .parse()
            .expect("content length");
        let body_start = header_end + 4;
        let body = &rest[body_start..body_start + length];
        messages.push(serde_json::from_str(body).expect("json body"));
        rest = &rest[body_start + length..];
    }
    messages
}

fn run_server(input: String) -> Vec<Value> {
    let mut server = DapServer::new(Cursor::new(input.into_bytes()), Vec::new());
    serve(&mut server).expect("server loop");
    parse_output(&server.into_writer())
}

fn response<'a>(messages: &'a [Value], request_seq: u64) -> &'a Value {
    messages
        .iter()
        .find(|m| m["type"] == "response" && m["request_seq"] == request_seq)
        .unwrap_or_else(|| panic!("no response for request {request_seq}"))
}

#[cfg(test)]
mod dap_tests {
    use super::*;

    #[test]
    fn test_initialize_sends_initialized_event() {
        let messages = run_server(request(1, "initialize", json!({})));

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["success"], true);
        assert_eq!(messages[0]["body"]["supportsConditionalBreakpoints"], true);
        assert_eq!(messages[1]["event"], "initialized");
    }

    #[test]
    fn test_breakpoint_sources_session() {
        let input = [
            request(1, "loadedSource", json!({ "source": { "id": "A", "url": "http://example.com/b.js" } })),
            request(2, "loadedSource", json!({ "source": { "id": "B", "url": "http://example.com/a.js" } })),
            request(3, "setBreakpoints", json!({
                "source": { "id": "A" },
                "breakpoints": [{ "line": 1, "text": "x" }]
            })),
            request(4, "setBreakpoints", json!({
                "source": { "id": "B" },
                "breakpoints": [{ "line": 1, "hidden": true, "text": "y" }]
            })),
            request(5, "breakpointSources", Value::Null),
            request(6, "disconnect", Value::Null),
        ]
        .concat();

        let messages = run_server(input);

        let set = response(&messages, 3);
        assert_eq!(set["body"]["breakpoints"][0]["verified"], true);
        assert_eq!(set["body"]["breakpoints"][0]["line"], 1);

        let groups = &response(&messages, 5)["body"]["groups"];
        assert_eq!(groups.as_array().unwrap().len(), 1);
        assert_eq!(groups[0]["source"]["id"], "A");
        assert_eq!(groups[0]["breakpoints"][0]["text"], "x");

        assert_eq!(response(&messages, 6)["success"], true);
    }

    #[test]
    fn test_black_box_and_change_events() {
        let input = [
            request(1, "loadedSource", json!({ "source": { "id": "A", "url": "a.js" } })),
            request(2, "setBreakpoints", json!({
                "source": { "id": "A" },
                "breakpoints": [{ "line": 3, "condition": "i > 1" }]
            })),
            request(3, "blackBox", json!({ "source": { "id": "A" }, "blackBox": true })),
            request(4, "breakpointSources", Value::Null),
        ]
        .concat();

        let messages = run_server(input);

        let changes: Vec<&Value> = messages
            .iter()
            .filter(|m| m["event"] == "breakpointSourcesChanged")
            .map(|m| &m["body"]["groups"])
            .collect();
        assert_eq!(changes, vec![&json!(0), &json!(1), &json!(0)]);

        assert_eq!(response(&messages, 3)["body"]["isBlackBoxed"], true);
        assert!(response(&messages, 4)["body"]["groups"]
            .as_array()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_unverified_breakpoints_for_unknown_source() {
        let messages = run_server(request(
            1,
            "setBreakpoints",
            json!({ "source": { "id": "later" }, "breakpoints": [{ "line": 2, "text": "z" }] }),
        ));
        let set = response(&messages, 1);
        assert_eq!(set["success"], true);
        assert_eq!(set["body"]["breakpoints"][0]["verified"], false);
    }

    #[test]
    fn test_client_responses_are_not_dispatched() {
        let input = frame(&json!({
            "seq": 1,
            "type": "response",
            "request_seq": 9,
            "success": true,
            "command": "disconnect"
        })) + &request(2, "breakpointSources", Value::Null);

        let messages = run_server(input);

        assert_eq!(messages.len(), 1);
        let listed = response(&messages, 2);
        assert_eq!(listed["command"], "breakpointSources");
        assert_eq!(listed["success"], true);
    }

    #[test]
    fn test_malformed_message_does_not_end_session() {
        let input = "Content-Length: 9\r\n\r\n{not json".to_string()
            + &request(2, "loadedSource", json!({ "source": { "id": "A", "url": "a.js" } }))
            + &request(3, "disconnect", Value::Null);

        let mut server = DapServer::new(Cursor::new(input.into_bytes()), Vec::new());
        serve(&mut server).expect("session survives a bad frame");
        assert_eq!(server.context().sources().len(), 1);

        let messages = parse_output(&server.into_writer());
        assert_eq!(response(&messages, 2)["success"], true);
        assert_eq!(response(&messages, 3)["success"], true);
    }

    #[test]
    fn test_errors_become_failed_responses() {
        let input = [
            request(1, "selectSource", json!({ "source": { "id": "ghost" } })),
            request(2, "blackBox", Value::Null),
            request(3, "stepIn", json!({})),
        ]
        .concat();

        let messages = run_server(input);

        let select = response(&messages, 1);
        assert_eq!(select["success"], false);
        assert_eq!(select["message"], "unknown source: ghost");
        assert_eq!(response(&messages, 2)["success"], false);
        assert_eq!(response(&messages, 3)["success"], false);
    }
}

#[cfg(test)]
mod console_tests {
    use super::*;

    fn run_console(script: &str) -> String {
        let mut console =
            Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new()).without_prompt();
        console.run().expect("console loop");
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn test_console_session() {
        let out = run_console(
            r#"source main "http://example.com/js/main.js"
source vendor http://example.com/js/vendor.js --blackboxed
break main 12 --text "render()"
break main 4:8 --condition "user == null"
break vendor 1 --text lib()
list
"#,
        );

        assert!(out.contains("loaded main as main.js"));
        assert!(out.contains("main.js [main]"));
        assert!(!out.contains("vendor.js ["), "black-boxed source listed");

        let listing = &out[out.find("main.js [main]").unwrap()..];
        let four = listing.find("4:8").unwrap();
        let twelve = listing.find("12  render()").unwrap();
        assert!(four < twelve, "breakpoints not sorted by line");
        assert!(listing.contains("if (user == null)"));
    }

    #[test]
    fn test_console_disable_enable() {
        let out = run_console(
            "source s s.js\n\
             break s 2\n\
             list\n\
             disable s 2\n\
             list\n\
             enable s 2\n\
             list\n",
        );
        let listings: Vec<&str> = out.match_indices("(no breakpoints)").map(|(_, s)| s).collect();
        assert_eq!(listings.len(), 2);
        assert!(out.contains("[disabled]"));
    }

    #[test]
    fn test_console_reports_bad_input() {
        let out = run_console("break\nselect ghost\nhelp\n");
        assert!(out.contains("error: usage: break"));
        assert!(out.contains("error: unknown source: ghost"));
        assert!(out.contains("Commands:"));
    }
}
