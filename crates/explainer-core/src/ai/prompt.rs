//! Prompt construction for the remote reviewer

use crate::ai::ChatMessage;
use explainer_shared::AnalysisRequest;

/// Fixed system instruction for every request
pub const SYSTEM_INSTRUCTION: &str = "You are an expert code reviewer. Analyze the given code snippet and provide:\n\
1. A clear explanation of what it does\n\
2. Concrete improvement suggestions with exact code\n\
3. Potential bugs or issues\n\n\
Format improvements as actionable items with code snippets.";

/// User message embedding project summary, file type, context and the snippet
pub fn user_message(request: &AnalysisRequest) -> String {
    format!(
        "Project Structure:\n{summary}\n\n\
File Type: {file_type}\n\n\
Context:\n{context}\n\n\
Code to analyze:\n```{fence}\n{code}\n```\n\n\
Please provide:\n\
1. Brief explanation\n\
2. 2-3 concrete improvements with code\n\
3. Potential bugs",
        summary = request.project_summary,
        file_type = request.file_type,
        context = request.surrounding_context,
        fence = request.file_type.to_lowercase(),
        code = request.code,
    )
}

/// System + user messages for one request
pub fn build_messages(request: &AnalysisRequest) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_INSTRUCTION),
        ChatMessage::user(user_message(request)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MessageRole;

    #[test]
    fn test_user_message_layout() {
        let request = AnalysisRequest::new(
            "fn main() {}",
            "Rust",
            "Total files: 1",
            "Imports:\nuse std::fmt;\n\n",
        );

        let message = user_message(&request);

        assert!(message.starts_with("Project Structure:\nTotal files: 1\n\n"));
        assert!(message.contains("File Type: Rust\n\n"));
        assert!(message.contains("Context:\nImports:\nuse std::fmt;"));
        assert!(message.contains("```rust\nfn main() {}\n```"));
        assert!(message.ends_with("3. Potential bugs"));
    }

    #[test]
    fn test_messages_are_system_then_user() {
        let request = AnalysisRequest::new("x", "Python", "", "");
        let messages = build_messages(&request);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[0].content, SYSTEM_INSTRUCTION);
        assert_eq!(messages[1].role, MessageRole::User);
    }
}
