use crate::domain::llm::LlmRequest;

/// Returned instead of calling the generator when nothing was retrieved
pub const FALLBACK_ANSWER: &str =
    "Jeg har ingen relevant information i mine dokumenter til at svare på det spørgsmål.";

const PROMPT_HEADER: &str = "Du er en hjælpsom AI assistent. Brug den kontekst nedenfor til at svare på brugerens spørgsmål.

Vigtigt: Hvis du kun finder DELE af et svar (fx punkt 1 og 7 ud af en liste med 10 punkter), skal du:
- Angive de punkter du HAR fundet
- Tydeligt skrive hvilke punkter der mangler
- Ikke opfinde information om de manglende punkter

Kontekst:
---
";

const PROMPT_FOOTER: &str = "\n---";

/// Instruction carrying the partial-match policy with the context embedded unmodified
pub fn build_system_prompt(context: &str) -> String {
    let mut prompt = String::with_capacity(PROMPT_HEADER.len() + context.len() + PROMPT_FOOTER.len());
    prompt.push_str(PROMPT_HEADER);
    prompt.push_str(context);
    prompt.push_str(PROMPT_FOOTER);
    prompt
}

/// Instruction and raw query as two separate user turns
pub fn build_generation_request(context: &str, query: &str) -> LlmRequest {
    LlmRequest::builder()
        .user(build_system_prompt(context))
        .user(query)
        .build()
}
