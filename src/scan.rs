//! Highlighting many snippets without hogging the host for too long.
//!
//! The work is kept in an explicit [`ScanTask`] that processes items in slices, so that a host
//! with its own event loop can run one slice, do something else and come back later.

use std::time::{Duration, Instant};

use crate::class_attr::parse_class_attr;
use crate::registry::Registry;
use crate::renderers::DEFAULT_TAB_WIDTH;

/// How long a slice can run before handing control back to the host
pub const DEFAULT_SLICE_BUDGET: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// If false, everything is processed in a single slice
    pub time_sliced: bool,
    pub slice_budget: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            time_sliced: true,
            slice_budget: DEFAULT_SLICE_BUDGET,
        }
    }
}

impl ScanOptions {
    fn budget(&self) -> Option<Duration> {
        self.time_sliced.then_some(self.slice_budget)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// There are items left, call `run_slice` again
    Yielded,
    Complete,
}

/// A queue of items and how far in it we are.
#[derive(Debug, Clone)]
pub struct ScanTask<T> {
    queue: Vec<T>,
    cursor: usize,
}

impl<T> ScanTask<T> {
    pub fn new(queue: Vec<T>) -> Self {
        Self { queue, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len() - self.cursor
    }

    /// Processes items in order until the queue is empty or `budget` is spent.
    ///
    /// The budget is checked after each item so a slice always makes progress.
    /// Once the queue is exhausted, this returns [`ScanState::Complete`] without calling `f`.
    pub fn run_slice(&mut self, budget: Option<Duration>, mut f: impl FnMut(&T)) -> ScanState {
        let start = Instant::now();
        while let Some(item) = self.queue.get(self.cursor) {
            f(item);
            self.cursor += 1;
            if self.cursor < self.queue.len()
                && let Some(budget) = budget
                && start.elapsed() >= budget
            {
                return ScanState::Yielded;
            }
        }
        ScanState::Complete
    }

    pub fn into_inner(self) -> Vec<T> {
        self.queue
    }
}

/// Runs scan tasks to completion, calling back into the host between slices.
pub struct Scanner<F> {
    between_slices: F,
}

impl Scanner<fn()> {
    /// A scanner yielding the current thread between slices.
    pub fn new() -> Self {
        Self {
            between_slices: std::thread::yield_now,
        }
    }
}

impl Default for Scanner<fn()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FnMut()> Scanner<F> {
    /// `between_slices` is called every time a slice runs out of budget.
    pub fn with_host(between_slices: F) -> Self {
        Self { between_slices }
    }

    /// Processes every item of the task in order and then calls `on_complete`.
    pub fn scan<T>(
        &mut self,
        mut task: ScanTask<T>,
        options: &ScanOptions,
        mut process: impl FnMut(&T),
        on_complete: impl FnOnce(),
    ) {
        #[cfg(feature = "debug")]
        let mut slices = 1;
        while task.run_slice(options.budget(), &mut process) == ScanState::Yielded {
            #[cfg(feature = "debug")]
            {
                slices += 1;
            }
            (self.between_slices)();
        }
        #[cfg(feature = "debug")]
        log::debug!(
            "scanned {} items in {slices} slices",
            task.into_inner().len()
        );
        on_complete();
    }
}

/// A code element found in a page: its `class` attribute and its inner HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeElement<'a> {
    pub class: &'a str,
    pub html: &'a str,
}

/// Highlights every element with the language and line numbers its class asks for.
///
/// The result is in the same order as `elements`. Elements that fail to highlight are
/// returned unchanged.
pub fn prettify_all(
    elements: &[CodeElement<'_>],
    registry: &Registry,
    options: &ScanOptions,
) -> Vec<String> {
    let mut out = Vec::with_capacity(elements.len());
    Scanner::new().scan(
        ScanTask::new(elements.to_vec()),
        options,
        |element| {
            let parsed = parse_class_attr(element.class);
            out.push(registry.prettify_or_original(
                element.html,
                parsed.lang,
                &parsed.options(DEFAULT_TAB_WIDTH),
            ));
        },
        || {},
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_stop_when_out_of_budget() {
        let mut task = ScanTask::new(vec![1, 2, 3]);
        let mut seen = Vec::new();

        assert_eq!(
            task.run_slice(Some(Duration::ZERO), |i| seen.push(*i)),
            ScanState::Yielded
        );
        assert_eq!(seen, vec![1]);
        assert_eq!(task.remaining(), 2);

        assert_eq!(
            task.run_slice(Some(Duration::ZERO), |i| seen.push(*i)),
            ScanState::Yielded
        );
        // The last item completes the task even with no budget left
        assert_eq!(
            task.run_slice(Some(Duration::ZERO), |i| seen.push(*i)),
            ScanState::Complete
        );
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn completed_task_does_not_reprocess() {
        let mut task = ScanTask::new(vec!["a", "b"]);
        let mut calls = 0;
        assert_eq!(task.run_slice(None, |_| calls += 1), ScanState::Complete);
        assert_eq!(task.run_slice(None, |_| calls += 1), ScanState::Complete);
        assert_eq!(calls, 2);
        assert_eq!(task.remaining(), 0);
    }

    #[test]
    fn empty_task_is_complete() {
        let mut task: ScanTask<u8> = ScanTask::new(vec![]);
        assert_eq!(task.run_slice(Some(Duration::ZERO), |_| {}), ScanState::Complete);
    }

    #[test]
    fn scanner_processes_in_order_and_completes_once() {
        let mut yields = 0;
        let mut seen = Vec::new();
        let mut completed = 0;
        let options = ScanOptions {
            time_sliced: true,
            slice_budget: Duration::ZERO,
        };
        Scanner::with_host(|| yields += 1).scan(
            ScanTask::new(vec![1, 2, 3, 4]),
            &options,
            |i| seen.push(*i),
            || completed += 1,
        );
        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert_eq!(yields, 3);
        assert_eq!(completed, 1);
    }

    #[test]
    fn not_time_sliced_runs_in_one_go() {
        let mut yields = 0;
        let options = ScanOptions {
            time_sliced: false,
            slice_budget: Duration::ZERO,
        };
        Scanner::with_host(|| yields += 1).scan(
            ScanTask::new(vec![(); 10]),
            &options,
            |_| {},
            || {},
        );
        assert_eq!(yields, 0);
    }

    #[test]
    fn can_prettify_all_elements() {
        let registry = Registry::with_builtin_languages().unwrap();
        let elements = [
            CodeElement {
                class: "prettyprint lang-json",
                html: "true",
            },
            CodeElement {
                class: "prettyprint linenums",
                html: "a",
            },
        ];
        let out = prettify_all(&elements, &registry, &ScanOptions::default());
        assert_eq!(
            out,
            vec![
                r#"<span class="kwd">true</span>"#.to_string(),
                r#"<ol class="linenums"><li class="L0"><span class="pln">a</span></li></ol>"#
                    .to_string(),
            ]
        );
    }
}
