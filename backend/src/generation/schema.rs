//! Response schemas sent with JSON-mode requests

use serde_json::{json, Value};

pub fn meal() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING", "description": "Name of the dish (in Thai)" },
            "calories": { "type": "NUMBER", "description": "Approximate calories" },
            "protein": { "type": "NUMBER", "description": "Approximate protein in grams" },
            "carbs": { "type": "NUMBER", "description": "Approximate carbs in grams" },
            "fats": { "type": "NUMBER", "description": "Approximate fats in grams" },
            "description": {
                "type": "STRING",
                "description": "Short description and key ingredients (in Thai)"
            },
            "cookingTime": {
                "type": "STRING",
                "description": "Estimated cooking time e.g., '15 นาที'"
            }
        },
        "required": ["name", "calories", "description"]
    })
}

pub fn day_plan() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "day": { "type": "STRING", "description": "Day name (e.g., วันจันทร์)" },
            "breakfast": meal(),
            "lunch": meal(),
            "dinner": meal(),
            "snack": meal(),
            "totalCalories": { "type": "NUMBER" }
        },
        "required": ["day", "breakfast", "lunch", "dinner", "totalCalories"]
    })
}

pub fn weekly_plan() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "days": { "type": "ARRAY", "items": day_plan() }
        },
        "required": ["days"]
    })
}
