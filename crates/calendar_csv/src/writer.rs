use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use schedule_extract::Game;
use tracing::debug;

use crate::{CalendarFormat, CsvError, HEADERS, UTF8_BOM};

/// One import row for a fixture.
pub fn game_row(game: &Game, format: &CalendarFormat) -> [String; 7] {
    let subject = format!("{} vs {}@{}", game.venue_relation(), game.opponent(), game.venue());
    let date = game.date().format("%Y-%m-%d").to_string();

    match game.time_bounds(format.event_duration) {
        None => [
            format!("{subject}{}", format.undecided_suffix),
            date.clone(),
            String::new(),
            date,
            String::new(),
            "True".to_string(),
            game.venue().to_string(),
        ],
        Some((start, end)) => [
            subject,
            date,
            start.format("%H:%M").to_string(),
            end.format("%Y-%m-%d").to_string(),
            end.format("%H:%M").to_string(),
            "False".to_string(),
            game.venue().to_string(),
        ],
    }
}

/// BOM, header row, then one row per game. Rows end with CRLF.
pub fn write_games<W: Write>(mut out: W, games: &[Game], format: &CalendarFormat) -> Result<(), CsvError> {
    out.write_all(UTF8_BOM.as_bytes())?;
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(out);
    writer.write_record(HEADERS)?;
    for game in games {
        writer.write_record(game_row(game, format))?;
    }
    writer.flush()?;
    debug!("Wrote {} calendar rows", games.len());
    Ok(())
}

pub fn write_games_to_path(path: &Path, games: &[Game], format: &CalendarFormat) -> Result<(), CsvError> {
    let file = File::create(path)?;
    write_games(BufWriter::new(file), games, format)
}
