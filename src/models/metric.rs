//! Metric updates.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::client::StatusioClient;
use crate::error::{Result, StatusioError};
use crate::operation::Operation;
use crate::request::{ParamValue, Params};
use crate::response::ApiResponse;

/// One aggregation window of a metric (day, week, or month).
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    /// Average over the window.
    pub average: f64,
    /// Start of the window.
    pub start: DateTime<Utc>,
    /// Sample timestamps.
    pub dates: Vec<DateTime<Utc>>,
    /// Sample values, one per timestamp.
    pub values: Vec<f64>,
}

impl MetricSeries {
    fn write_params(&self, prefix: &str, params: &mut Params) -> Result<()> {
        if self.dates.len() != self.values.len() {
            return Err(StatusioError::InvalidParameter {
                name: format!("{prefix}_values"),
                reason: format!(
                    "{} values for {} dates",
                    self.values.len(),
                    self.dates.len()
                ),
            });
        }

        let average = ParamValue::from_f64(self.average).ok_or_else(|| non_finite(prefix, "avg"))?;
        let values = ParamValue::from_f64s(&self.values).ok_or_else(|| non_finite(prefix, "values"))?;
        let dates: Vec<String> = self
            .dates
            .iter()
            .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, false))
            .collect();

        params.insert(format!("{prefix}_avg"), average);
        params.insert(format!("{prefix}_start"), self.start.timestamp_millis());
        params.insert(format!("{prefix}_dates"), dates);
        params.insert(format!("{prefix}_values"), values);
        Ok(())
    }
}

fn non_finite(prefix: &str, field: &str) -> StatusioError {
    StatusioError::InvalidParameter {
        name: format!("{prefix}_{field}"),
        reason: "NaN and infinite values cannot be sent".to_string(),
    }
}

/// A full metric update: the day, week, and month windows.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricUpdate {
    pub metric_id: String,
    pub day: MetricSeries,
    pub week: MetricSeries,
    pub month: MetricSeries,
}

impl MetricUpdate {
    fn to_params(&self, statuspage_id: &str) -> Result<Params> {
        let mut params = Params::new()
            .with("statuspage_id", statuspage_id)
            .with("metric_id", self.metric_id.as_str());
        self.day.write_params("day", &mut params)?;
        self.week.write_params("week", &mut params)?;
        self.month.write_params("month", &mut params)?;
        Ok(params)
    }
}

/// Replace the data of a metric.
///
/// # Errors
///
/// Returns [`StatusioError::InvalidParameter`] for mismatched or non-finite
/// series, or an error if the request fails.
#[tracing::instrument(skip(client, update), fields(metric_id = %update.metric_id))]
pub async fn update_metric(
    client: &StatusioClient,
    statuspage_id: &str,
    update: &MetricUpdate,
) -> Result<ApiResponse> {
    let params = update.to_params(statuspage_id)?;
    client.invoke(Operation::MetricUpdate, &[], params).await
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn series(values: Vec<f64>) -> MetricSeries {
        let start = Utc.with_ymd_and_hms(2014, 3, 28, 5, 43, 0).unwrap();
        MetricSeries {
            average: 20.5,
            start,
            dates: vec![start; values.len()],
            values,
        }
    }

    fn update(day: MetricSeries) -> MetricUpdate {
        MetricUpdate {
            metric_id: "mt1".to_string(),
            day,
            week: series(vec![1.0]),
            month: series(vec![2.0]),
        }
    }

    #[test]
    fn test_metric_params() {
        let params = update(series(vec![20.7, 19.0])).to_params("p1").unwrap();

        assert_eq!(params.len(), 14);
        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(body["day_avg"], serde_json::json!(20.5));
        assert_eq!(body["day_start"], serde_json::json!(1_395_985_380_000i64));
        assert_eq!(
            body["day_dates"],
            serde_json::json!(["2014-03-28T05:43:00+00:00", "2014-03-28T05:43:00+00:00"])
        );
        assert_eq!(body["day_values"], serde_json::json!([20.7, 19.0]));
        assert_eq!(body["month_values"], serde_json::json!([2.0]));
    }

    #[test]
    fn test_metric_rejects_nan() {
        let result = update(series(vec![f64::NAN])).to_params("p1");
        assert!(matches!(
            result,
            Err(StatusioError::InvalidParameter { name, .. }) if name == "day_values"
        ));
    }

    #[test]
    fn test_metric_rejects_length_mismatch() {
        let mut day = series(vec![1.0, 2.0]);
        day.dates.pop();
        assert!(update(day).to_params("p1").is_err());
    }
}
