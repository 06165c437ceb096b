//! Prompt filtering capability.
//!
//! The pipeline applies a caller-supplied filter to the prompt before any
//! cache or provider work. Redaction logic itself (PII scrubbing and the
//! like) lives outside this crate; the core only invokes the hook.

/// A prompt transformation hook, typically PII redaction.
///
/// Implementations must be pure with respect to the prompt: same input,
/// same output, no side effects the pipeline needs to know about.
pub trait PromptFilter: Send + Sync {
    fn filter(&self, prompt: &str) -> String;
}

/// Any plain closure works as a filter.
impl<F> PromptFilter for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn filter(&self, prompt: &str) -> String {
        self(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_implement_the_capability() {
        let redact = |prompt: &str| prompt.replace("555-0100", "[phone]");
        let filter: &dyn PromptFilter = &redact;
        assert_eq!(filter.filter("call 555-0100"), "call [phone]");
    }
}
