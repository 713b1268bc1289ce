use crate::calendar;
use crate::model::{DayCategory, GenerationResult, Snapshot, StaffMember};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use std::collections::BTreeSet;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const EXPORT_DATE_FORMAT: &str = "%Y/%m/%d";

/// Import du personnel depuis CSV:
/// header `name,target_weekday,target_holiday[,unavailability][,preferences]`,
/// dates ISO séparées par `;`.
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<StaffMember>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid staff row (empty name)");
        }
        let weekday = parse_count(rec.get(1))
            .with_context(|| format!("invalid target_weekday for {name}"))?;
        let holiday = parse_count(rec.get(2))
            .with_context(|| format!("invalid target_holiday for {name}"))?;
        let unavailability = parse_dates(rec.get(3).unwrap_or(""))
            .with_context(|| format!("invalid unavailability for {name}"))?;
        let preferences = parse_dates(rec.get(4).unwrap_or(""))
            .with_context(|| format!("invalid preferences for {name}"))?;
        out.push(
            StaffMember::new(name, weekday, holiday)
                .with_unavailability(unavailability)
                .with_preferences(preferences),
        );
    }
    Ok(out)
}

/// Import des jours fériés: header `date` (ISO).
pub fn import_holidays_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<BTreeSet<NaiveDate>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = BTreeSet::new();
    for rec in rdr.records() {
        let rec = rec?;
        let raw = rec.get(0).context("missing date")?.trim();
        if raw.is_empty() {
            continue;
        }
        out.insert(parse_date(raw)?);
    }
    Ok(out)
}

fn parse_count(raw: Option<&str>) -> anyhow::Result<u32> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0),
        Some(s) => s.parse().with_context(|| format!("expected a count, got {s:?}")),
    }
}

pub fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date: {raw}"))
}

/// Liste de dates séparées par `;` ou `,`.
pub fn parse_dates(raw: &str) -> anyhow::Result<Vec<NaiveDate>> {
    raw.split([';', ','])
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(parse_date)
        .collect()
}

/// Ligne d'export relue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub assignee: String,
    pub note: String,
}

struct DisplayRow {
    date: String,
    weekday: String,
    category: &'static str,
    assignee: String,
    note: String,
}

fn display_rows(snapshot: &Snapshot, result: &GenerationResult) -> Vec<DisplayRow> {
    result
        .shifts
        .iter()
        .map(|shift| {
            let category = match shift.category() {
                DayCategory::Weekday => "weekday",
                DayCategory::Holiday if calendar::is_weekend(shift.date) => "weekend",
                DayCategory::Holiday => "holiday",
            };
            let assignee = snapshot
                .find_staff_by_id(&shift.staff_id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| "unknown".to_string());
            let note = result
                .violation_for(shift.date)
                .map(|v| v.message.clone())
                .unwrap_or_default();
            DisplayRow {
                date: shift.date.format(EXPORT_DATE_FORMAT).to_string(),
                weekday: shift.date.format("%a").to_string(),
                category,
                assignee,
                note,
            }
        })
        .collect()
}

/// Export CSV d'une variante (BOM UTF-8 pour les tableurs):
/// header `date,weekday,category,assignee,note`.
pub fn export_result_csv<W: Write>(
    mut out: W,
    snapshot: &Snapshot,
    result: &GenerationResult,
) -> anyhow::Result<()> {
    out.write_all(UTF8_BOM)?;
    let mut w = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(out);
    w.write_record(["date", "weekday", "category", "assignee", "note"])?;
    for row in display_rows(snapshot, result) {
        w.write_record([
            row.date.as_str(),
            row.weekday.as_str(),
            row.category,
            row.assignee.as_str(),
            row.note.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_result_csv_to_path<P: AsRef<Path>>(
    path: P,
    snapshot: &Snapshot,
    result: &GenerationResult,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    export_result_csv(file, snapshot, result)
}

/// Relit un export CSV (BOM toléré).
pub fn parse_result_csv<R: Read>(mut input: R) -> anyhow::Result<Vec<ExportRow>> {
    let mut raw = Vec::new();
    input.read_to_end(&mut raw)?;
    let body = raw.strip_prefix(UTF8_BOM).unwrap_or(raw.as_slice());

    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(body);
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let date = rec.get(0).context("missing date")?;
        let date = NaiveDate::parse_from_str(date, EXPORT_DATE_FORMAT)
            .with_context(|| format!("invalid export date: {date}"))?;
        out.push(ExportRow {
            date,
            assignee: rec.get(3).context("missing assignee")?.to_string(),
            note: rec.get(4).unwrap_or("").to_string(),
        });
    }
    Ok(out)
}

/// Texte tabulé pour copier-coller dans un tableur.
pub fn clipboard_text(snapshot: &Snapshot, result: &GenerationResult) -> String {
    display_rows(snapshot, result)
        .iter()
        .map(|r| format!("{}({})\t{}\t{}", r.date, r.weekday, r.assignee, r.note))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Export JSON de toutes les variantes (jolie mise en forme)
pub fn export_results_json<P: AsRef<Path>>(
    path: P,
    results: &[GenerationResult],
) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(results)?;
    fs::write(path, s)?;
    Ok(())
}
