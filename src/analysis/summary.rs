//! Summary synthesis from the assembled analysis
//!
//! Pure function, no I/O. Insight order is stable: time-series insights
//! per keyword, then the regional-coverage insight, then recommendations.

use crate::models::{DataQuality, InterestOverTime, RegionalInterest, Summary};

/// Derive narrative insights, a data-quality record and recommendations
#[must_use]
pub fn synthesize(
    keywords: &[String],
    interest: Option<&InterestOverTime>,
    has_related_data: bool,
    regional: Option<&RegionalInterest>,
) -> Summary {
    let mut summary = Summary::default();

    if let Some(interest) = interest {
        for keyword in keywords {
            let Some(average) = interest.average_interest.get(keyword) else {
                continue;
            };
            let direction = interest
                .trend_direction
                .get(keyword)
                .map(|t| t.direction.to_string())
                .unwrap_or_else(|| String::from("unknown"));

            summary.key_insights.push(format!(
                "{keyword}: Average interest of {average:.1}, trend is {direction}"
            ));
        }
    }

    if let Some(regional) = regional {
        let count = regional.region_count();
        if count > 0 {
            summary
                .key_insights
                .push(format!("Regional analysis available for {count} countries"));
        }
    }

    summary.data_quality = DataQuality {
        has_time_series: interest.is_some_and(|i| !i.data.is_empty()),
        has_related_data,
        has_regional_data: regional.is_some_and(|r| !r.by_country.is_empty()),
        keywords_analyzed: keywords.len(),
    };

    if keywords.len() == 1 {
        summary
            .recommendations
            .push(String::from("Consider comparing with related keywords for better insights"));
    }

    if !summary.data_quality.has_regional_data {
        summary
            .recommendations
            .push(String::from("Try regional analysis to understand geographic patterns"));
    }

    summary
}
