use chrono::NaiveDate;

use crate::engine::resolve_holiday;
use crate::error::HrisResult;
use crate::model::holiday::Holiday;
use crate::repo::HolidayRepository;

/// The single holiday in force on `date`, if any.
pub async fn holiday_on(repo: &dyn HolidayRepository, date: NaiveDate) -> HrisResult<Option<Holiday>> {
    let candidates = repo.holiday_candidates(date).await?;
    if candidates.len() > 1 {
        tracing::debug!(%date, candidates = candidates.len(), "Several holidays match, applying tie-break");
    }
    Ok(resolve_holiday(&candidates, date).cloned())
}
