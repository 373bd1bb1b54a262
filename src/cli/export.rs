use anyhow::Result;

use habitus::config::HabitusConfig;

/// Export every stored sample as JSON to stdout.
pub fn export(config: &HabitusConfig) -> Result<()> {
    let conn = habitus::db::open_database(config.resolved_db_path())?;
    let samples = habitus::progress::store::all_samples(&conn)?;

    let json = serde_json::to_string_pretty(&samples)?;
    println!("{json}");

    eprintln!("Exported {} samples.", samples.len());
    Ok(())
}
