const GREETINGS: &[&str] = &["hey!", "hello", "what's up?", "yo"];
const CHECK_INS: &[&str] = &["how's it going?", "how are ya?", "feeling okay?"];

/// Reply to a greeting addressed to the bot, if it is one we know.
pub fn reply(text: &str, user: &str) -> Option<String> {
    let text = text.trim().to_lowercase();
    if GREETINGS.contains(&text.as_str()) {
        Some(format!("What's up {user}?"))
    } else if CHECK_INS.contains(&text.as_str()) {
        Some(format!("I'm doing well, how are you {user}?"))
    } else {
        None
    }
}
