// crates/clutchreel-vision/src/parse.rs
//
// Response parsing cascade: a model's free-form reply is expected to
// contain a JSON object somewhere, but rarely comes back clean. Three
// attempts, each looser than the last; if all fail the frame is still
// usable — see `FrameAnalysis::degraded`.

use clutchreel_core::frame_analysis::FrameAnalysisRaw;
use clutchreel_core::FrameAnalysis;

pub fn parse_response(text: &str, timestamp: f64, model: &str) -> FrameAnalysis {
    if let Some(raw) = try_whole_body(text)
        .or_else(|| try_fenced_block(text))
        .or_else(|| try_first_brace_object(text))
    {
        FrameAnalysis::from_raw(raw, timestamp, model)
    } else {
        FrameAnalysis::degraded(timestamp, model)
    }
}

fn try_whole_body(text: &str) -> Option<FrameAnalysisRaw> {
    serde_json::from_str(text.trim()).ok()
}

fn try_fenced_block(text: &str) -> Option<FrameAnalysisRaw> {
    let start = text.find("```json")?;
    let after_fence = &text[start + "```json".len()..];
    let end = after_fence.find("```")?;
    serde_json::from_str(after_fence[..end].trim()).ok()
}

/// Scan for the first balanced `{...}` substring, ignoring braces inside
/// string literals, and try to parse it.
fn try_first_brace_object(text: &str) -> Option<FrameAnalysisRaw> {
    let bytes = text.as_bytes();
    let start = text.find('{')?;

    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return serde_json::from_str(&text[start..=i]).ok();
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clean_json_body() {
        let a = parse_response(r#"{"kill_log": true, "kill_count": 2}"#, 1.0, "m");
        assert!(a.kill_log);
        assert_eq!(a.kill_count, 2);
        assert!(!a.is_sentinel_failed());
    }

    #[test]
    fn strips_fenced_json_block() {
        let text = "Here you go:\n```json\n{\"kill_log\": true}\n```\nhope that helps";
        let a = parse_response(text, 1.0, "m");
        assert!(a.kill_log);
    }

    #[test]
    fn finds_first_balanced_object_among_prose() {
        let text = "sure! {\"match_status\": \"clutch\", \"nested\": {\"a\": 1}} -- done";
        let a = parse_response(text, 1.0, "m");
        assert_eq!(a.match_status, clutchreel_core::MatchStatus::Clutch);
    }

    #[test]
    fn unparseable_text_degrades_without_error_marker() {
        let a = parse_response("I cannot help with that.", 3.0, "m");
        assert!(!a.is_sentinel_failed());
        assert_eq!(a.match_status, clutchreel_core::MatchStatus::Unknown);
    }

    #[test]
    fn braces_inside_string_literals_do_not_confuse_the_scanner() {
        let text = r#"{"scene_description": "a { weird } caption", "kill_log": true}"#;
        let a = parse_response(text, 1.0, "m");
        assert!(a.kill_log);
        assert_eq!(a.scene_description, "a { weird } caption");
    }
}
