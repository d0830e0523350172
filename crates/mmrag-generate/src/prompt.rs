use mmrag_core::traits::CompletionRequest;

pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that answers questions based on the provided context.";

/// Render the user prompt: retrieved text, the question, then the image paths.
pub fn grounded_prompt(query: &str, relevant_text: &[String], relevant_images: &[String]) -> String {
    let context = relevant_text.join("\n");
    let images = relevant_images.iter().map(|p| format!("'{p}'")).collect::<Vec<_>>().join(", ");
    format!(
        "Context: {context}\n\n\
         Query: {query}\n\n\
         Relevant image paths: [{images}]\n\n\
         Please provide a response to the query based on the given context and mention any relevant images by their paths.\n"
    )
}

pub fn completion_request(
    query: &str,
    relevant_text: &[String],
    relevant_images: &[String],
    model: &str,
    max_tokens: u32,
) -> CompletionRequest {
    CompletionRequest {
        system_prompt: SYSTEM_PROMPT.to_string(),
        user_prompt: grounded_prompt(query, relevant_text, relevant_images),
        model: model.to_string(),
        max_tokens,
    }
}
