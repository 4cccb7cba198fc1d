use std::path::Path;

use tracing::{error, info, instrument};

use crate::business::{PlaceholderPage, load_business_info, populate};

/// Fetch the business-info document once and fill `page`.
///
/// Any read or parse failure is logged and population is abandoned; slots keep
/// whatever they held before. Returns the number of slots written.
#[instrument(skip_all, fields(source = %source.display()))]
pub async fn run(source: &Path, page: &mut PlaceholderPage) -> usize {
    let info = match load_business_info(source).await {
        Ok(info) => info,
        Err(err) => {
            error!(error = ?err, "business info unavailable");
            return 0;
        }
    };
    let written = populate(page, &info);
    info!(
        written,
        slots = page.slots().len(),
        "business info populated"
    );
    written
}
