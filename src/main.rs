use anyhow::Result;
use console::style;
use env_logger::Env;
use log::info;
use media_mover::component::MediaOrganizer;
use media_mover::component::media_organizer::OrganizeResult;
use media_mover::config::Config;
use media_mover::signal::setup_shutdown_signal;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::new()?;
    let shutdown_signal = setup_shutdown_signal();

    info!(
        "Starting media mover: {} -> photos {}, videos {}",
        config.source_location.display(),
        config.photo_dest_location.display(),
        config.video_dest_location.display()
    );

    let organizer = MediaOrganizer::new(&config, shutdown_signal)?;
    let result = organizer.run()?;

    print_summary(&result);

    Ok(())
}

fn print_summary(result: &OrganizeResult) {
    println!();
    println!("{}", style("=== Organizing summary ===").cyan().bold());
    println!("  Moved: {} files", style(result.files_moved).green());

    if result.duplicates_found > 0 {
        println!(
            "  Duplicates kept in place: {}",
            style(result.duplicates_found).yellow()
        );
    }
    if result.duplicates_deleted > 0 {
        println!(
            "  Duplicate sources deleted: {}",
            style(result.duplicates_deleted).yellow()
        );
    }
    if result.skipped_unsupported > 0 {
        println!(
            "  Skipped (unsupported type): {}",
            style(result.skipped_unsupported).yellow()
        );
    }
    if result.errors > 0 {
        println!("  Failed: {} files", style(result.errors).red());
    }

    println!("  Total seen: {} files", result.total_files());
}
