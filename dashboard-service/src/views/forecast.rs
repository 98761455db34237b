use energy_client::domain::{ForecastField, ForecastTable, TimeSeriesTable, EA};
use time::OffsetDateTime;

use crate::{
    error::DashboardError,
    transform::derive,
    views::{resolve_station, ForecastView, NamedSeries, ViewRequest},
};

/// Historical net active energy leading into the forecast band.
///
/// History runs from `history_start` (or the first reading) up to and
/// including the first forecast timestamp.
pub fn forecast(
    table: &TimeSeriesTable,
    forecast: &ForecastTable,
    req: &ViewRequest,
    history_start: Option<OffsetDateTime>,
) -> Result<ForecastView, DashboardError> {
    let station = resolve_station(table, req.station.as_deref())?;

    let yhat = forecast.series(&station, ForecastField::Yhat)?;
    let yhat_lower = forecast.series(&station, ForecastField::YhatLower)?;
    let yhat_upper = forecast.series(&station, ForecastField::YhatUpper)?;

    let history = derive(table, &station)?
        .ea
        .slice(history_start, forecast.start());

    Ok(ForecastView {
        history: NamedSeries::windowed(EA, &history, req.from, req.to),
        yhat: NamedSeries::windowed(ForecastField::Yhat.as_str(), &yhat, req.from, req.to),
        yhat_lower: NamedSeries::windowed(
            ForecastField::YhatLower.as_str(),
            &yhat_lower,
            req.from,
            req.to,
        ),
        yhat_upper: NamedSeries::windowed(
            ForecastField::YhatUpper.as_str(),
            &yhat_upper,
            req.from,
            req.to,
        ),
        station,
    })
}
