use yaku_provider::ChatPrompt;

use crate::executor::TranslationRequest;

/// Build the system instruction + user message for one translation run.
///
/// Language identification and translation are folded into a single model
/// call: the instruction encodes the direction rule instead of asking for a
/// separate detection step.
pub fn build_prompt(request: &TranslationRequest) -> ChatPrompt {
    ChatPrompt {
        system: build_system_prompt(
            &request.primary_language,
            &request.secondary_language,
            &request.known_languages,
            &request.custom_instructions,
        ),
        user: request.source_text.clone(),
    }
}

pub fn build_system_prompt(
    primary: &str,
    secondary: &str,
    known_languages: &[String],
    custom_instructions: &str,
) -> String {
    let vocabulary = known_languages.join(", ");

    let mut prompt = format!(
        "You are a translator working between a fixed pair of languages.\n\
         Primary language: {primary}. Secondary language: {secondary}.\n\
         Identify the language of the text yourself, then pick the direction:\n\
         - If the text is written in {primary}, translate it to {secondary}.\n\
         - If the text is written in {secondary} or any other language, translate it to {primary}.\n\
         - If the text mixes languages, treat the language with the most words as its language \
         and apply the rules above.\n\
         Languages you may encounter include: {vocabulary}.\n\
         IMPORTANT: Return ONLY the translated text. Do not include any explanations, notes, \
         or phrases like \"Here is the translation\" or \"The translation is\". \
         Just the translated text itself."
    );

    let custom = custom_instructions.trim();
    if !custom.is_empty() {
        prompt.push_str("\n\nAdditional instructions:\n");
        prompt.push_str(custom);
    }

    prompt
}
