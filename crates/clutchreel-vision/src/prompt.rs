// crates/clutchreel-vision/src/prompt.rs
//
// The fixed system-style instruction sent with every still frame. It
// enumerates exactly the FrameAnalysis fields so the response parser (see
// `parse.rs`) has a single schema to coerce against regardless of which
// model in the fallback list answered.

pub const VISION_PROMPT: &str = concat!(
    "You are analysing a single still frame from a competitive first-person ",
    "shooter match. Reply with ONLY a JSON object, no prose, no markdown ",
    "fence, matching exactly this shape:\n",
    "{\n",
    "  \"kill_log\": boolean,\n",
    "  \"kill_count\": integer >= 0,\n",
    "  \"match_status\": one of \"normal\" | \"clutch\" | \"victory\" | \"defeat\" | \"overtime\" | \"unknown\",\n",
    "  \"action_intensity\": one of \"very_high\" | \"high\" | \"medium\" | \"low\",\n",
    "  \"enemy_visible\": boolean,\n",
    "  \"enemy_count\": integer >= 0,\n",
    "  \"visual_quality\": one of \"cinematic\" | \"high\" | \"normal\" | \"low\",\n",
    "  \"scene_description\": short string,\n",
    "  \"ui_elements\": short string describing visible HUD elements,\n",
    "  \"confidence\": number in [0, 1]\n",
    "}\n",
    "If a kill-feed entry appears anywhere in frame, set kill_log true and ",
    "kill_count to the number of entries visible. Judge action_intensity from ",
    "motion blur, muzzle flash density, and HUD damage indicators.",
);

pub fn build_request_body(model: &str, image_b64: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": VISION_PROMPT },
                { "type": "image_url", "image_url": { "url": format!("data:image/jpeg;base64,{image_b64}") } },
            ],
        }],
    })
}
