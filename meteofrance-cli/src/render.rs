use anyhow::Result;
use chrono::SecondsFormat;
use meteofrance_core::{LocalTime, Rain, Snow};
use std::collections::BTreeMap;
use std::fmt::Write;

fn timestamp(dt: &LocalTime) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, false)
}

pub fn rain_report(rain: &Rain) -> Result<String> {
    let mut out = String::new();

    writeln!(
        out,
        "{} ({}, {}), altitude {} m",
        rain.location_name(),
        rain.french_department(),
        rain.country(),
        rain.altitude()
    )?;
    writeln!(out, "Updated: {}", timestamp(&rain.update_time()?))?;

    writeln!(out, "Forecast:")?;
    for slot in rain.forecasts() {
        let at = rain.localize_time(slot.time)?;
        writeln!(
            out,
            "  {}  [{}] {}",
            at.format("%H:%M"),
            slot.rain_intensity,
            slot.rain_intensity_description
        )?;
    }

    match rain.next_rain_date_locale()? {
        Some(next) => writeln!(out, "Next rain: {}", timestamp(&next))?,
        None => writeln!(out, "No rain expected within the hour")?,
    }

    Ok(out)
}

pub fn snow_report(snow: &Snow, altitude: Option<i32>, location: Option<&str>) -> Result<String> {
    let mut out = String::new();

    writeln!(
        out,
        "{} ({}-{} m), updated {}",
        snow.massif_name(),
        snow.massif_altitude_min(),
        snow.massif_altitude_max(),
        snow.update_time()
    )?;
    writeln!(out, "Max avalanche risk: {}", snow.max_avalanche_risk())?;
    if !snow.dangerous_expositions().is_empty() {
        writeln!(
            out,
            "Dangerous expositions: {}",
            snow.dangerous_expositions().join(", ")
        )?;
    }

    // Hash maps come back unordered.
    let risks: BTreeMap<_, _> = snow.avalanche_risks_by_location().into_iter().collect();
    writeln!(out, "Avalanche risk by location:")?;
    for (value, risk) in &risks {
        writeln!(out, "  {value}: {risk}")?;
    }

    let limits: BTreeMap<_, _> = snow.snow_limits().into_iter().collect();
    writeln!(out, "Snow limits:")?;
    for (exposition, limit) in &limits {
        writeln!(out, "  {exposition}: {limit} m")?;
    }

    let altitudes: Vec<String> = snow
        .available_altitudes()
        .iter()
        .map(ToString::to_string)
        .collect();
    writeln!(out, "Altitudes: {}", altitudes.join(", "))?;

    writeln!(out, "Total snow depth:")?;
    for row in snow.snow_depths() {
        writeln!(
            out,
            "  {:>3} {:>5} m  {} cm",
            row.exposition, row.altitude, row.total_snow_depth
        )?;
    }

    writeln!(out, "Fresh snow:")?;
    for (date, cells) in snow.fresh_snow_index() {
        writeln!(out, "  {date}")?;
        let cells: BTreeMap<_, _> = cells.into_iter().collect();
        for ((alt, exposition), value) in cells {
            writeln!(out, "    {exposition:>3} {alt:>5} m  {value} cm")?;
        }
    }

    if let Some(alt) = altitude {
        match snow.snow_depth_at_altitude(alt) {
            Some(depth) => writeln!(out, "Snow depth at {alt} m: {depth} cm")?,
            None => writeln!(out, "No snow measurement at {alt} m")?,
        }
    }

    if let Some(value) = location {
        match snow.avalanche_risk_by_location(value) {
            Some(risk) => writeln!(out, "Avalanche risk at '{value}': {risk}")?,
            None => writeln!(out, "No avalanche risk for '{value}'")?,
        }
    }

    Ok(out)
}
