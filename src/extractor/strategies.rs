//! Text strategies.
//!
//! Each strategy looks for the review text in a different rendering variant.
//! They run in fixed priority order and the first valid candidate wins; once
//! one succeeds, later strategies never run.

use super::validity::{check_comment, clean_final_text};
use super::EntryView;
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::dom;
use crate::patterns::{NOISE_CHARS, STRUCTURAL_DENYLIST};
use crate::result::{ExtractionResult, Strategy};

/// What a single strategy produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    /// A candidate that passed the validity predicate.
    Success(String),
    /// A candidate was found but rejected.
    Invalid { text: String, reason: String },
    /// Nothing to judge: the markup this strategy reads is absent.
    Error(String),
}

impl StrategyOutcome {
    /// Run the validity predicate over a candidate.
    fn judge(text: String) -> Self {
        match check_comment(&text) {
            Ok(()) => Self::Success(text),
            Err(why) => Self::Invalid {
                text,
                reason: why.as_str().to_string(),
            },
        }
    }
}

/// Strategies in priority order.
pub const CHAIN: [Strategy; 4] = [
    Strategy::Primary,
    Strategy::TaggedScan,
    Strategy::StructuralScan,
    Strategy::NarrowFallback,
];

/// Run one strategy against an entry.
#[must_use]
pub fn run_strategy(strategy: Strategy, entry: &EntryView) -> StrategyOutcome {
    match strategy {
        Strategy::Primary => primary_block(entry),
        Strategy::TaggedScan => tagged_scan(entry),
        Strategy::StructuralScan => structural_scan(entry),
        Strategy::NarrowFallback => narrow_fallback(entry),
        Strategy::None => StrategyOutcome::Error("not a strategy".to_string()),
    }
}

/// Extract the review text of one entry.
///
/// Every attempt, rejection and acceptance is reported to `sink`.
pub fn extract_text(entry: &EntryView, sink: &mut dyn DiagnosticSink) -> ExtractionResult {
    for strategy in CHAIN {
        sink.on_diagnostic(entry.id, &DiagnosticEvent::StrategyAttempted { strategy });

        match run_strategy(strategy, entry) {
            StrategyOutcome::Success(text) => {
                let text = clean_final_text(&text);
                sink.on_diagnostic(
                    entry.id,
                    &DiagnosticEvent::TextAccepted {
                        strategy,
                        text: text.clone(),
                    },
                );
                return ExtractionResult {
                    text,
                    strategy,
                    valid: true,
                };
            }
            StrategyOutcome::Invalid { text, reason } => {
                tracing::trace!(entry = entry.id, %strategy, text = %text, "candidate rejected");
                sink.on_diagnostic(entry.id, &DiagnosticEvent::StrategyRejected { strategy, reason });
            }
            StrategyOutcome::Error(reason) => {
                sink.on_diagnostic(entry.id, &DiagnosticEvent::StrategyRejected { strategy, reason });
            }
        }
    }

    sink.on_diagnostic(entry.id, &DiagnosticEvent::NoValidText);
    ExtractionResult::none()
}

/// Join trimmed, non-empty texts with single spaces.
fn join_texts<I, S>(texts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .filter_map(|t| {
            let t = t.as_ref().trim();
            (!t.is_empty()).then(|| t.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// === Strategy 1: primary block ===

fn primary_block(entry: &EntryView) -> StrategyOutcome {
    let selectors = entry.selectors();
    for span in entry.find_each(&selectors.primary_text) {
        let Some(node) = span.nodes().first() else {
            continue;
        };
        if entry.page.in_owner_reply(node) {
            continue;
        }
        return StrategyOutcome::judge(dom::trimmed_text(&span));
    }
    StrategyOutcome::Error("no review text span outside the owner reply".to_string())
}

// === Strategy 2: tagged global scan ===

fn tagged_scan(entry: &EntryView) -> StrategyOutcome {
    let owned = entry.page.owned_tagged(entry.id);
    if owned.is_empty() {
        return StrategyOutcome::Error("no tagged text owned by the entry".to_string());
    }
    let text = join_texts(
        owned
            .iter()
            .filter(|node| !entry.page.is_tag(node))
            .map(|node| node.text().to_string()),
    );
    if text.is_empty() {
        return StrategyOutcome::Error("tagged text holds only tags".to_string());
    }
    StrategyOutcome::judge(text)
}

// === Strategy 3: structural subtree scan ===

/// Reason the structural noise filter rejects `text`, if any.
#[must_use]
pub fn structural_noise(text: &str) -> Option<String> {
    let filtered = NOISE_CHARS.replace_all(text, "");
    let words = filtered.split_whitespace().count();
    let lowercase = filtered.chars().filter(char::is_ascii_lowercase).count();
    #[allow(clippy::cast_precision_loss)]
    let ratio = lowercase as f64 / (filtered.chars().count() + 1) as f64;

    if words < 5 {
        return Some(format!("only {words} words"));
    }
    if ratio < 0.05 {
        return Some(format!("lowercase ratio {ratio:.3}"));
    }
    STRUCTURAL_DENYLIST
        .iter()
        .find(|token| text.contains(*token))
        .map(|token| format!("contains {token:?}"))
}

fn structural_scan(entry: &EntryView) -> StrategyOutcome {
    let mut texts = Vec::new();
    for node in entry.node.descendants() {
        if !node.is_element() || entry.page.in_owner_reply(&node) || entry.page.is_tag(&node) {
            continue;
        }
        let own = dom::own_text(&node);
        if !own.is_empty() {
            texts.push(own);
        }
    }

    let text = join_texts(&texts);
    if text.is_empty() {
        return StrategyOutcome::Error("no text outside the owner reply".to_string());
    }
    match structural_noise(&text) {
        Some(reason) => StrategyOutcome::Invalid { text, reason },
        None => StrategyOutcome::judge(text),
    }
}

// === Strategy 4: narrow fallback ===

fn narrow_fallback(entry: &EntryView) -> StrategyOutcome {
    let selectors = entry.selectors();
    let Some(block) = entry.find(&selectors.narrow_text) else {
        return StrategyOutcome::Error("no narrow review-text block".to_string());
    };
    // `select` only matches descendants, so the marker itself never counts.
    let tagged = dom::select_each(&block, &selectors.tagged_text);
    let text = join_texts(
        tagged
            .iter()
            .filter(|sel| sel.nodes().first().is_some_and(|node| !entry.page.is_tag(node)))
            .map(dom::trimmed_text),
    );
    if text.is_empty() {
        return StrategyOutcome::Error("narrow block holds no tagged text".to_string());
    }
    StrategyOutcome::judge(text)
}
