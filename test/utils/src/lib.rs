pub fn coffee_mission_fixture() -> &'static str {
    return "A sustainable coffee roastery in Seattle, modern and earthy";
}

/// Strategy payload as the structured text model returns it for the coffee
/// roastery mission.
pub fn strategy_fixture() -> &'static str {
    return r##"
{
  "colors": [
    { "hex": "#3B2A20", "name": "Dark Roast", "usage": "Primary" },
    { "hex": "#7A8B5C", "name": "Cascade Moss", "usage": "Secondary" },
    { "hex": "#D9C7A7", "name": "Oat Crema", "usage": "Background" },
    { "hex": "#C8553D", "name": "Kiln Ember", "usage": "Accent" },
    { "hex": "#2F3E46", "name": "Sound Fog", "usage": "Text" }
  ],
  "typography": {
    "headerFont": "Playfair Display",
    "bodyFont": "Inter",
    "reasoning": "A refined serif for craft, paired with a neutral sans for clarity."
  },
  "logoPrompts": {
    "primary": "Minimal flat vector logo of a coffee bean shaped like an evergreen tree, dark roast brown and moss green, clean white background",
    "secondary": "Simple circular monogram icon of a coffee bean leaf, kiln ember orange on oat crema"
  },
  "brandVoice": "Warm, grounded and quietly confident."
}
"##
    .trim();
}

/// Same payload as `strategy_fixture` but without the optional brand voice.
pub fn strategy_without_voice_fixture() -> &'static str {
    return r##"
{
  "colors": [
    { "hex": "#112233", "name": "Midnight", "usage": "Primary" }
  ],
  "typography": {
    "headerFont": "Montserrat",
    "bodyFont": "Lora",
    "reasoning": "Geometric headers over a readable serif."
  },
  "logoPrompts": {
    "primary": "Geometric owl logo",
    "secondary": "Owl eye icon"
  }
}
"##
    .trim();
}

/// Base64 of a tiny PNG header, enough to stand in for rendered image bytes.
pub fn png_base64_fixture() -> &'static str {
    return "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";
}
