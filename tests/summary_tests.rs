#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Result};
    use std::sync::Mutex;

    use issue_digest::config::{Config, SectionConfig};
    use issue_digest::error::SummaryError;
    use issue_digest::github::CommentSource;
    use issue_digest::llm::{CompletionClient, CompletionRequest};
    use issue_digest::models::{Inputs, IssueContext, IssueRef, RawComment, RawUser, BOT_LOGIN};
    use issue_digest::sections::{
        is_add_section, CommentSummarySection, SummaryOptions, CHUNK_SEPARATOR,
        MERGE_INSTRUCTION,
    };
    use issue_digest::tokenizers::{Tokenizer, MODEL_MAX_TOKENS};

    const TEMPLATE: &str = "Summarize {{issueTitle}}\n{{issueBody}}\nComments: {{issueComments}}";

    struct ByteTokenizer;

    impl Tokenizer for ByteTokenizer {
        fn encode(&self, text: &str) -> Vec<usize> {
            text.bytes().map(usize::from).collect()
        }

        fn decode(&self, tokens: &[usize]) -> Result<String> {
            let bytes: Vec<u8> = tokens.iter().map(|&t| t as u8).collect();
            Ok(String::from_utf8(bytes)?)
        }
    }

    struct FakeComments {
        comments: Vec<RawComment>,
        fail: bool,
    }

    impl CommentSource for FakeComments {
        fn list_issue_comments(&self, _issue: &IssueRef) -> Result<Vec<RawComment>> {
            if self.fail {
                return Err(anyhow!("rate limited"));
            }
            Ok(self.comments.clone())
        }
    }

    /// Answers with a digest of the prompt and records every request.
    #[derive(Default)]
    struct RecordingCompletions {
        requests: Mutex<Vec<CompletionRequest>>,
        fail_on_call: Option<usize>,
    }

    impl RecordingCompletions {
        fn failing_on(call: usize) -> Self {
            Self {
                fail_on_call: Some(call),
                ..Self::default()
            }
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl CompletionClient for RecordingCompletions {
        fn create_completion(&self, request: &CompletionRequest) -> Result<String> {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            if self.fail_on_call == Some(requests.len()) {
                return Err(anyhow!("quota exceeded"));
            }
            Ok(format!("summary of {} bytes", request.prompt.len()))
        }
    }

    fn comment(body: &str, login: &str) -> RawComment {
        RawComment {
            body: Some(body.to_string()),
            created_at: Some("2023-04-01T12:00:00Z".to_string()),
            user: Some(RawUser {
                login: Some(login.to_string()),
            }),
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.bot_login = BOT_LOGIN.to_string();
        config.sections.comment_summary = SectionConfig {
            prompt: Some(TEMPLATE.to_string()),
            title: Some("Discussion summary".to_string()),
        };
        config
    }

    fn inputs(max_tokens: usize) -> Inputs {
        Inputs {
            model: "text-davinci-003".to_string(),
            max_tokens,
            add_comment_summary_section: true,
        }
    }

    fn context() -> IssueContext {
        IssueContext {
            issue: IssueRef {
                owner: "acme".to_string(),
                repo: "widgets".to_string(),
                number: 12,
            },
            title: Some("Crash on start".to_string()),
            body: Some("The app crashes.".to_string()),
        }
    }

    #[test]
    fn test_is_add_section() {
        assert!(is_add_section(&inputs(256), &config()));

        let mut disabled = inputs(256);
        disabled.add_comment_summary_section = false;
        assert!(!is_add_section(&disabled, &config()));

        let mut no_title = config();
        no_title.sections.comment_summary.title = None;
        assert!(!is_add_section(&inputs(256), &no_title));

        let mut empty_prompt = config();
        empty_prompt.sections.comment_summary.prompt = Some(String::new());
        assert!(!is_add_section(&inputs(256), &empty_prompt));
    }

    #[test]
    fn test_bot_comments_are_not_summarized() {
        let source = FakeComments {
            comments: vec![
                comment("Same crash here", "alice"),
                comment("Previous summary", BOT_LOGIN),
            ],
            fail: false,
        };
        let completions = RecordingCompletions::default();
        let section = CommentSummarySection::new(&source, &completions, &ByteTokenizer);

        let sections = section
            .create_section(&inputs(256), &config(), &context())
            .unwrap();

        let requests = completions.requests();
        assert_eq!(requests.len(), 2);

        let chunk_prompt = &requests[0].prompt;
        assert!(chunk_prompt.starts_with("Summarize Crash on start\nThe app crashes.\nComments: ["));
        assert!(chunk_prompt.contains("Same crash here"));
        assert!(!chunk_prompt.contains("Previous summary"));
        assert_eq!(chunk_prompt.matches("\"author\"").count(), 1);

        let merge = &requests[1];
        assert_eq!(
            merge.prompt,
            format!(
                "{}{}summary of {} bytes",
                MERGE_INSTRUCTION,
                CHUNK_SEPARATOR,
                chunk_prompt.len()
            )
        );
        assert!(requests
            .iter()
            .all(|r| r.model == "text-davinci-003" && r.max_tokens == 256));

        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].prompt,
            "Summarize Crash on start\nThe app crashes.\nComments: "
        );
        assert_eq!(sections[0].title, "Discussion summary");
        assert_eq!(
            sections[0].description,
            format!("summary of {} bytes", merge.prompt.len())
        );
    }

    #[test]
    fn test_no_comments_still_merges() {
        let source = FakeComments {
            comments: vec![comment("Previous summary", BOT_LOGIN)],
            fail: false,
        };
        let completions = RecordingCompletions::default();
        let section = CommentSummarySection::new(&source, &completions, &ByteTokenizer);

        let plan = section
            .plan(&inputs(256), &config(), &context())
            .unwrap()
            .unwrap();
        assert!(plan.comments.is_empty());
        assert!(plan.chunks.is_empty());

        let sections = section
            .create_section(&inputs(256), &config(), &context())
            .unwrap();

        let requests = completions.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, MERGE_INSTRUCTION);
        assert_eq!(sections.len(), 1);
    }

    #[test]
    fn test_long_threads_are_chunked_within_the_window() {
        let comments: Vec<_> = (0..10)
            .map(|i| comment(&format!("comment {} {}", i, "x".repeat(300)), "alice"))
            .collect();
        let source = FakeComments {
            comments,
            fail: false,
        };
        let completions = RecordingCompletions::default();
        let section = CommentSummarySection::new(&source, &completions, &ByteTokenizer);
        let max_tokens = 3000;

        let plan = section
            .plan(&inputs(max_tokens), &config(), &context())
            .unwrap()
            .unwrap();
        assert_eq!(plan.budget, MODEL_MAX_TOKENS - max_tokens - plan.prompt_tokens);
        let report = plan.report();
        assert!(report.chunk_tokens.len() > 1);
        assert_eq!(report.completion_requests(), plan.chunks.len() + 1);

        section
            .create_section(&inputs(max_tokens), &config(), &context())
            .unwrap();

        let requests = completions.requests();
        assert_eq!(requests.len(), plan.chunks.len() + 1);
        for request in &requests[..plan.chunks.len()] {
            assert!(ByteTokenizer.count(&request.prompt) + max_tokens <= MODEL_MAX_TOKENS);
        }

        // Each chunk prompt is the bare prompt followed by its slice of comments
        let comments_text: String = requests[..plan.chunks.len()]
            .iter()
            .map(|r| r.prompt.strip_prefix(plan.prompt.as_str()).unwrap())
            .collect();
        for i in 0..10 {
            assert!(comments_text.contains(&format!("comment {} ", i)));
        }
    }

    #[test]
    fn test_parallel_keeps_chunk_order() {
        let comments: Vec<_> = (0..40)
            .map(|i| comment(&format!("note {} {}", i, "y".repeat(i * 7)), "bob"))
            .collect();

        let run = |parallel: bool| {
            let source = FakeComments {
                comments: comments.clone(),
                fail: false,
            };
            let completions = RecordingCompletions::default();
            let section = CommentSummarySection::new(&source, &completions, &ByteTokenizer)
                .with_options(SummaryOptions {
                    parallel,
                    show_progress: false,
                });
            section
                .create_section(&inputs(3500), &config(), &context())
                .unwrap();
            completions.requests().last().unwrap().prompt.clone()
        };

        let sequential = run(false);
        assert!(sequential.matches(CHUNK_SEPARATOR).count() > 3);
        assert_eq!(run(true), sequential);
    }

    #[test]
    fn test_completion_failure_aborts() {
        let comments: Vec<_> = (0..10)
            .map(|i| comment(&format!("comment {} {}", i, "z".repeat(300)), "alice"))
            .collect();
        let source = FakeComments {
            comments,
            fail: false,
        };
        let completions = RecordingCompletions::failing_on(2);
        let section = CommentSummarySection::new(&source, &completions, &ByteTokenizer);

        let err = section
            .create_section(&inputs(3000), &config(), &context())
            .unwrap_err();

        assert_eq!(err.to_string(), "quota exceeded");
        assert_eq!(completions.requests().len(), 2);
    }

    #[test]
    fn test_retrieval_failure_propagates() {
        let source = FakeComments {
            comments: Vec::new(),
            fail: true,
        };
        let completions = RecordingCompletions::default();
        let section = CommentSummarySection::new(&source, &completions, &ByteTokenizer);

        let err = section
            .create_section(&inputs(256), &config(), &context())
            .unwrap_err();

        assert_eq!(err.to_string(), "rate limited");
        assert!(completions.requests().is_empty());
    }

    #[test]
    fn test_oversized_completion_length_fails_fast() {
        let source = FakeComments {
            comments: vec![comment("hello", "alice")],
            fail: false,
        };
        let completions = RecordingCompletions::default();
        let section = CommentSummarySection::new(&source, &completions, &ByteTokenizer);

        let err = section
            .create_section(&inputs(MODEL_MAX_TOKENS), &config(), &context())
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SummaryError>(),
            Some(SummaryError::TokenBudgetExhausted { .. })
        ));
        assert!(completions.requests().is_empty());
    }

    #[test]
    fn test_unconfigured_section_produces_nothing() {
        let source = FakeComments {
            comments: vec![comment("hello", "alice")],
            fail: false,
        };
        let completions = RecordingCompletions::default();
        let section = CommentSummarySection::new(&source, &completions, &ByteTokenizer);

        let sections = section
            .create_section(&inputs(256), &Config::default(), &context())
            .unwrap();

        assert!(sections.is_empty());
        assert!(completions.requests().is_empty());
    }
}
