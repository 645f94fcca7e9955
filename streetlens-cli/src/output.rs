//! User-facing rendering of the match result.

use colored::Colorize;
use streetlens_core::{CompassPoint, ComparePair, MatchResult, SensorSnapshot};

/// Meters below 1 km, otherwise kilometers with one decimal.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} m", meters.round() as i64)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

/// Heading with its compass point, e.g. `270° (W)`.
pub fn format_heading(heading: u16) -> String {
    format!("{}° ({})", heading, CompassPoint::from_heading(heading))
}

/// Print the success view: comparison pair, summary, and optional story.
pub fn render_success(result: &MatchResult, pair: Option<&ComparePair>, snapshot: &SensorSnapshot) {
    println!();
    println!("{}", "Found a match in the archive!".green().bold());
    println!();

    if let Some(pair) = pair {
        println!(
            "   {} {}  [{}]",
            "Your photo:".dimmed(),
            pair.before_src,
            pair.before_label
        );
        println!(
            "   {} {}  [{}]",
            "Historical:".dimmed(),
            pair.after_src,
            pair.after_label
        );
    } else {
        println!("   {} {}", "Historical:".dimmed(), result.historical_url);
    }

    println!();
    println!("   {} {}%", "Confidence:".dimmed(), result.confidence);
    println!("   {} {}", "Year:".dimmed(), result.year);
    println!(
        "   {} {} from where you stood",
        "Distance:".dimmed(),
        format_distance(result.distance_meters)
    );
    if let Some(heading) = snapshot.heading {
        println!("   {} {}", "Facing:".dimmed(), format_heading(heading));
    }

    if let Some(story) = &result.story {
        println!();
        println!("   {}", format!("\u{201c}{}\u{201d}", story.quote).italic());
        println!("   {}", story.fact);
        if let Some(source) = &story.source {
            println!("   {} {}", "Source:".dimmed(), source);
        }
    }
}

/// Print the failure view. The message is shown verbatim; control returns to
/// the user to retry.
pub fn render_failure(message: &str) {
    println!();
    println!("{}", message.red());
    println!("{}", "You can retry the same photo.".dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance_meters() {
        assert_eq!(format_distance(12.4), "12 m");
        assert_eq!(format_distance(999.4), "999 m");
    }

    #[test]
    fn test_format_distance_kilometers() {
        assert_eq!(format_distance(1000.0), "1.0 km");
        assert_eq!(format_distance(2540.0), "2.5 km");
    }

    #[test]
    fn test_format_heading_includes_compass_point() {
        assert_eq!(format_heading(270), "270° (W)");
        assert_eq!(format_heading(0), "0° (N)");
    }
}
