use horadric_config::VisionConfig;
use horadric_core::RequestTemplate;

pub const SYSTEM_PROMPT: &str = "You are an OCR-style vision assistant. Read ONLY the item tooltip text in the image. \
Return the text as it appears, preserving line breaks, without extra commentary. \
Do NOT include the bottom control-hint lines such as 'Shift + Left Click to Unequip' or \
'Ctrl + Left Click to Move'. \
If the item is part of a set, do NOT include the list of other set items \
that always appears at the very bottom (e.g., 'NAJ'S ANCIENT VESTIGE, TAL RASHA'S WRAPPINGS ...'). \
Only return the actual stats and description of the currently hovered item. \
After the item text, add this line: \
[CATEGORY: X] where X is one of: WEAPON, ARMOR, CHARM, RING, AMULET, JEWEL, GEM, RUNE, RUNEWORD, MISC";

pub const USER_PROMPT: &str =
    "Extract the exact text content from this item tooltip. Only output the text, no explanations.";

/// Per-run request settings built from config.
pub fn request_template(config: &VisionConfig) -> RequestTemplate {
    RequestTemplate {
        model: config.model.clone(),
        system_prompt: SYSTEM_PROMPT.to_string(),
        user_prompt: USER_PROMPT.to_string(),
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    }
}
