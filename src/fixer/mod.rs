//! Interactive coordinate repair.
//!
//! Walks every address still carrying the fallback coordinates, opens the
//! location in Google Maps, and accepts corrected coordinates pasted by the
//! operator. Progress is checkpointed after every address, a backup of the
//! working set is written every five fixes, and a later session can resume
//! where this one stopped or start from any backup.

pub mod input;
pub mod progress;

use crate::geocode::{CoordinateStore, Coordinates, GeocodeError};
use progress::FixProgress;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

enum SourceChoice {
    Original,
    Backup(PathBuf),
}

enum PromptAction {
    Update(Coordinates),
    Skip,
    Quit,
}

/// Run a full repair session over a coordinates file.
pub fn run_session(coordinates_path: &Path) -> Result<(), GeocodeError> {
    eprintln!("Store coordinate fixer");
    eprintln!("======================");

    let dir = coordinates_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();

    // Offer backups from earlier sessions before touching the original.
    let backups = progress::find_backups(&dir);
    let choice = choose_source(&backups, coordinates_path);

    let (mut store, backup_used) = match choice {
        SourceChoice::Original => (CoordinateStore::load(coordinates_path)?, None),
        SourceChoice::Backup(path) => {
            let store = CoordinateStore::load(&path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned());
            (store, name)
        }
    };
    let loaded_from_backup = backup_used.is_some();

    let already_fixed = store.fixed_count();
    let failed = store.fallback_addresses();

    if failed.is_empty() {
        eprintln!("No coordinates need fixing. All locations are properly geocoded.");
        if loaded_from_backup {
            eprintln!(
                "Consider renaming your backup to {}",
                coordinates_path.display()
            );
        }
        return Ok(());
    }

    eprintln!();
    eprintln!("Coordinate status:");
    eprintln!("  Already fixed:     {}", already_fixed);
    eprintln!("  Still need fixing: {}", failed.len());
    eprintln!(
        "  Progress:          {:.1}%",
        already_fixed as f64 / (already_fixed + failed.len()) as f64 * 100.0
    );

    // Resume applies only when working on the original file; a backup is
    // its own starting point.
    let mut start_index = 0;
    let mut session = None;
    if !loaded_from_backup {
        if let Some(existing) = progress::load_progress(&dir) {
            if existing.completed_count > 0 && ask_resume(&existing, failed.len()) {
                start_index = existing.completed_count.min(failed.len());
                session = Some(existing);
            } else {
                progress::clear_progress(&dir);
            }
        }
    }
    let mut session = session.unwrap_or_else(|| FixProgress::start(failed.len(), backup_used));

    eprintln!();
    eprintln!("Commands: skip (s) | quit (q) | maps (m to reopen)");

    let mut fixed_this_session = 0;
    let mut skipped_this_session = 0;

    for (i, address) in failed.iter().enumerate().skip(start_index) {
        match prompt_for_coordinates(address, i + 1, failed.len()) {
            PromptAction::Quit => {
                eprintln!();
                eprintln!("Saving progress and exiting...");
                break;
            }
            PromptAction::Skip => {
                skipped_this_session += 1;
                session.record(i, address, true);
                progress::save_progress(&dir, &session);
            }
            PromptAction::Update(coords) => {
                store.insert(address, coords);
                fixed_this_session += 1;
                session.record(i, address, false);
                progress::save_progress(&dir, &session);

                if fixed_this_session % 5 == 0 {
                    let backup = progress::backup_path(&dir);
                    store.save_to(&backup)?;
                    eprintln!("Progress auto-saved to {}", backup.display());
                }
            }
        }
    }

    let output = progress::fixed_output_path(&dir);
    store.save_to(&output)?;

    let remaining = store.fallback_addresses().len();
    eprintln!();
    eprintln!("Session complete");
    eprintln!("  Fixed this session:   {}", fixed_this_session);
    eprintln!("  Skipped this session: {}", skipped_this_session);
    eprintln!("  Still need fixing:    {}", remaining);
    eprintln!("  Output file:          {}", output.display());

    if remaining > 0 {
        eprintln!();
        eprintln!("Run this command again to continue; your progress is saved.");
    } else {
        eprintln!();
        eprintln!("All coordinates fixed.");
        progress::clear_progress(&dir);
    }

    Ok(())
}

/// Prompt on stderr and read one trimmed line. EOF ends the session.
fn ask(prompt: &str) -> String {
    eprint!("{}", prompt);
    let _ = io::stderr().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => "quit".to_string(),
        Ok(_) => line.trim().to_string(),
    }
}

fn choose_source(backups: &[progress::BackupSummary], original: &Path) -> SourceChoice {
    if backups.is_empty() {
        return SourceChoice::Original;
    }

    eprintln!();
    eprintln!("Backup files found");
    eprintln!("==================");
    eprintln!("Found {} backup file(s) from previous sessions:", backups.len());
    eprintln!();
    for (i, backup) in backups.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, backup.file_name());
        eprintln!("     Created:  {}", backup.label());
        eprintln!(
            "     Progress: {}/{} fixed ({:.1}%)",
            backup.fixed,
            backup.total,
            backup.percent_fixed()
        );
        eprintln!();
    }
    eprintln!(
        "  {}. Load original {} (start fresh)",
        backups.len() + 1,
        original.display()
    );

    loop {
        let reply = ask(&format!("\nChoose file to load (1-{}): ", backups.len() + 1));
        match reply.parse::<usize>() {
            Ok(n) if n >= 1 && n <= backups.len() => {
                let path = backups[n - 1].path.clone();
                eprintln!("Loading backup: {}", path.display());
                return SourceChoice::Backup(path);
            }
            Ok(n) if n == backups.len() + 1 => {
                eprintln!("Loading original {}", original.display());
                return SourceChoice::Original;
            }
            _ if reply == "quit" => return SourceChoice::Original,
            _ => eprintln!("Invalid choice. Please try again."),
        }
    }
}

fn ask_resume(existing: &FixProgress, remaining: usize) -> bool {
    eprintln!();
    eprintln!("Resume previous session?");
    eprintln!("========================");
    eprintln!("  Completed:    {} locations", existing.completed_count);
    eprintln!("  Last session: {}", existing.last_updated);
    eprintln!("  Remaining:    {} locations", remaining);
    eprintln!();
    eprintln!("  1. Resume  - continue from where you left off");
    eprintln!("  2. Restart - start over from the beginning");

    loop {
        match ask("\nChoose option (1-2): ").as_str() {
            "1" => {
                eprintln!("Resuming from previous session...");
                return true;
            }
            "2" | "quit" => {
                eprintln!("Starting fresh...");
                return false;
            }
            _ => eprintln!("Invalid option. Please choose 1 or 2"),
        }
    }
}

fn prompt_for_coordinates(address: &str, index: usize, total: usize) -> PromptAction {
    eprintln!();
    eprintln!("{}", "=".repeat(72));
    eprintln!("Location {}/{}", index, total);
    eprintln!("Address:  {}", address);
    eprintln!("{}", "=".repeat(72));

    let url = input::maps_url(address);
    eprintln!("Opening Google Maps...");
    input::open_browser(&url);

    eprintln!();
    eprintln!("Find the store on the map, right-click the building, copy the");
    eprintln!("coordinates from the context menu, and paste them below.");

    loop {
        let reply = ask("\nEnter coordinates (lat, lng): ").to_lowercase();

        match reply.as_str() {
            "quit" | "q" => return PromptAction::Quit,
            "skip" | "s" => {
                eprintln!("Skipping this location...");
                return PromptAction::Skip;
            }
            "maps" | "m" => {
                eprintln!("Re-opening Google Maps...");
                input::open_browser(&url);
                continue;
            }
            _ => {}
        }

        let Some((lat, lng)) = input::parse_coordinate_input(&reply) else {
            eprintln!("Could not parse coordinates. Please try again.");
            eprintln!("  Examples: \"40.7128, -74.0060\" or \"40.7128 -74.0060\"");
            continue;
        };

        match input::validate_coordinates(&lat, &lng) {
            Ok(coords) => {
                eprintln!("Coordinates accepted: {}", coords);
                return PromptAction::Update(coords);
            }
            Err(msg) => eprintln!("{}. Please try again.", msg),
        }
    }
}
