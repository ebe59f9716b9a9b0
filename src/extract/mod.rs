pub mod layout_map;
pub mod merge;
pub mod modules;
pub mod page;
pub mod table_select;

#[cfg(test)]
pub(crate) mod fixtures;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::core::error::{ExtractError, Result};
use crate::core::model::RawPageExtraction;
use crate::document::DocumentSource;

/// Geometric pass over every page, `jobs` pages at a time.
///
/// Results come back in page order whatever the worker count; the first
/// failing page aborts the run.
pub fn extract_pages(document: &dyn DocumentSource, jobs: usize) -> Result<Vec<RawPageExtraction>> {
    let page_count = document.page_count()?;
    log::info!("extracting {page_count} pages with {jobs} jobs");

    if jobs <= 1 {
        return (0..page_count)
            .map(|index| page::process_page(document, index))
            .collect();
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|err| ExtractError::Document(format!("failed to start worker pool: {err}")))?;
    // Folded in page order so the lowest failing page wins.
    let outcomes: Vec<Result<RawPageExtraction>> = pool.install(|| {
        (0..page_count)
            .into_par_iter()
            .map(|index| page::process_page(document, index))
            .collect()
    });
    outcomes.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::core::error::ExtractError;
    use crate::core::model::Weekday;
    use crate::document::{MemoryDocument, PageSource};
    use crate::extract::fixtures::TimetableFixture;
    use pretty_assertions::assert_eq;

    fn document() -> MemoryDocument {
        let pages = (0..5)
            .map(|i| {
                TimetableFixture::new(&format!("D{i}a Data Science"))
                    .module(Weekday::ALL[i], i, i + 1, "mgli\nmmuell")
                    .build()
            })
            .collect();
        MemoryDocument::new(pages)
    }

    #[test]
    fn worker_count_does_not_change_results() {
        let document = document();
        let serial = extract_pages(&document, 1).unwrap();
        let parallel = extract_pages(&document, 4).unwrap();
        assert_eq!(serial, parallel);
        let numbers: Vec<usize> = parallel.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn one_bad_page_fails_the_run() {
        let mut pages: Vec<_> = (0..3)
            .map(|_| TimetableFixture::new("D1a Data Science").build())
            .collect();
        pages.push(TimetableFixture::new("D1a Data Science").garble_time_label(2).build());
        let document = MemoryDocument::new(pages);
        assert!(extract_pages(&document, 2).is_err());
        assert!(extract_pages(&document, 1).is_err());
    }

    /// Holds back the first page so later pages finish before it.
    struct SlowFirstPage(MemoryDocument);

    impl DocumentSource for SlowFirstPage {
        fn page_count(&self) -> Result<usize> {
            self.0.page_count()
        }

        fn open_page(&self, index: usize) -> Result<Box<dyn PageSource>> {
            if index == 0 {
                std::thread::sleep(Duration::from_millis(300));
            }
            self.0.open_page(index)
        }
    }

    #[test]
    fn lowest_failing_page_is_reported_whatever_the_worker_count() {
        let broken = TimetableFixture::new("D1a Data Science").garble_time_label(0).build();
        let mut pages = vec![broken.clone()];
        pages.extend((0..4).map(|_| TimetableFixture::new("D1a Data Science").build()));
        pages.push(broken);
        let document = SlowFirstPage(MemoryDocument::new(pages));

        for jobs in [1, 3, 6] {
            let err = extract_pages(&document, jobs).unwrap_err();
            assert!(
                matches!(err, ExtractError::Page { page: 1, .. }),
                "jobs = {jobs}: {err}"
            );
        }
    }
}
