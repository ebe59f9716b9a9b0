use crate::core::error::Result;
use crate::core::geometry::Area;
use crate::core::model::{RawExtractedModule, RawPageExtraction};
use crate::document::{DocumentSource, PageSource};
use crate::extract::layout_map::{collect_unmerged_time_entries, map_table_layout};
use crate::extract::modules::modules_for_weekday;
use crate::extract::table_select::select_main_table;

/// Runs the geometric pass on one page, opening the page itself.
pub fn process_page(document: &dyn DocumentSource, page_index: usize) -> Result<RawPageExtraction> {
    let page_number = page_index + 1;
    document
        .open_page(page_index)
        .and_then(|page| extract_page(page.as_ref(), page_number))
        .map_err(|err| err.on_page(page_number))
}

pub fn extract_page(page: &dyn PageSource, page_number: usize) -> Result<RawPageExtraction> {
    log::debug!("page {page_number}: {} tables found", page.tables().len());
    let table = select_main_table(page.tables())?;

    let above_table_text = page
        .extract_text(&Area::new(0.0, 0.0, page.width(), table.bbox.y1))
        .unwrap_or_default();
    log::debug!("page {page_number}: text above table:\n{above_table_text}");

    let layout = map_table_layout(page, table)?;
    let entries = collect_unmerged_time_entries(page, table, &layout);

    let mut raw_extracted_modules: Vec<RawExtractedModule> = Vec::new();
    for (weekday, weekday_entries) in &entries {
        raw_extracted_modules.extend(modules_for_weekday(
            page,
            *weekday,
            weekday_entries,
            &layout,
            page_number,
        )?);
    }
    log::debug!("page {page_number}: {} modules", raw_extracted_modules.len());

    Ok(RawPageExtraction {
        page_number,
        raw_extracted_modules,
        above_table_text,
    })
}
