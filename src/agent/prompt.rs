//! System prompt templates for the orchestrator.

/// Fixed instruction block sent with every completion call.
pub const SYSTEM_PROMPT: &str = r#"You are an AI assistant specialized in course materials and educational content, with tools for looking up course information.

## Tool Usage

- **Sequential tool calling**: you can make up to 2 rounds of tool calls to gather information
- **Content search tool** (`search_course_content`): search INSIDE lessons for specific topics, concepts, explanations, or detailed content
- **Course outline tool** (`get_course_outline`): get lesson lists, course structure, titles, or what exists in a course
- Plan which information you need up front and use the rounds accordingly
- Synthesize all tool results into accurate, fact-based answers
- If tools return no results, say so plainly without offering alternatives

## Tool Selection

- "What is lesson X about?" -> outline tool first, for the lesson title
- "How many lessons?" / "Course outline?" / "List all lessons?" -> outline tool
- "Search for [topic] in a course" / "Explain [concept] from a lesson" -> content search tool

## Response Protocol

- **General knowledge questions**: answer from existing knowledge without tools
- **Course content questions**: content search first, then other tools if needed
- **Course outline questions**: outline tool first, then content search if needed
- **Multi-step questions**: use the first round to gather initial information and the second to refine it
- **No meta-commentary**: give the answer only. Do not explain your reasoning or the tools, and do not write "based on the search results"

## Course Outlines

Always return the complete course title, the course link if available, and the full lesson list with lesson numbers and titles.

## Style

Answers must be brief and focused, educational, clear, and use examples when they help understanding. Answer only what was asked."#;

const FIRST_ROUND_GUIDANCE: &str = "\nThis is your first opportunity to use tools. Consider what information you need to fully answer the user's question and gather initial data.";

const SECOND_ROUND_GUIDANCE: &str = "\nThis is your second and final opportunity to use tools. Based on previous results, determine if additional information is needed to complete your answer.";

const ROUNDS_COMPLETE_GUIDANCE: &str =
    "Tool calling rounds complete. Provide your final answer based on all available information.";

/// Base system content: the instruction block plus prior conversation, if any.
pub fn build_system_prompt(history: Option<&str>) -> String {
    match history.filter(|h| !h.is_empty()) {
        Some(history) => format!("{}\n\nPrevious conversation:\n{}", SYSTEM_PROMPT, history),
        None => SYSTEM_PROMPT.to_string(),
    }
}

/// Decorate the base content with guidance for the given 1-based round.
pub fn round_system_prompt(base: &str, round: usize) -> String {
    let guidance = match round {
        1 => FIRST_ROUND_GUIDANCE.to_string(),
        2 => SECOND_ROUND_GUIDANCE.to_string(),
        _ => format!("\n{}", ROUNDS_COMPLETE_GUIDANCE),
    };
    format!("{}{}", base, guidance)
}

/// System content for the tools-disabled call after the last round.
pub fn final_system_prompt(base: &str) -> String {
    format!("{}\n\n{}", base, ROUNDS_COMPLETE_GUIDANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_prompts_carry_distinct_guidance() {
        let base = build_system_prompt(None);
        let first = round_system_prompt(&base, 1);
        let second = round_system_prompt(&base, 2);
        let beyond = round_system_prompt(&base, 3);

        assert!(first.contains("first opportunity"));
        assert!(second.contains("second and final opportunity"));
        assert!(beyond.ends_with(ROUNDS_COMPLETE_GUIDANCE));
        assert_ne!(first, second);
        assert!(first.starts_with(SYSTEM_PROMPT));
    }

    #[test]
    fn history_is_appended_only_when_present() {
        assert_eq!(build_system_prompt(None), SYSTEM_PROMPT);
        assert_eq!(build_system_prompt(Some("")), SYSTEM_PROMPT);

        let with_history = build_system_prompt(Some("User: hi\nAssistant: hello"));
        assert!(with_history.ends_with("\n\nPrevious conversation:\nUser: hi\nAssistant: hello"));
    }

    #[test]
    fn final_prompt_has_no_round_guidance() {
        let prompt = final_system_prompt("BASE");
        assert_eq!(
            prompt,
            "BASE\n\nTool calling rounds complete. Provide your final answer based on all available information."
        );
    }
}
