//! Chart export
//!
//! Renders normalized records either as a draw.io CSV import document or as
//! a JSON array, and writes the result to a file or stdout.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{OutputFormat, OutputSettings};
use crate::error::{Error, Result};
use crate::org::NormalizedRecord;

/// Header used when no `output.template` is configured
///
/// The last line is the CSV column header the records are written under.
pub const DEFAULT_TEMPLATE: &str = r##"## Org chart generated by orgchart
## To import: draw.io > Arrange > Insert > Advanced > CSV..., then paste this file.
# label: %name%<br><i style="color:gray;">%title%</i><br><a href="mailto:%email%">%email%</a>
# style: label;whiteSpace=wrap;html=1;rounded=1;fillColor=#dae8fc;strokeColor=#6c8ebf;
# namespace: csvimport-
# identity: name
# connect: {"from": "manager", "to": "name", "invert": true, "style": "curved=1;endArrow=blockThin;endFill=1;fontSize=11;"}
# width: auto
# height: auto
# padding: 12
# ignore: email
# nodespacing: 40
# levelspacing: 100
# edgespacing: 40
# layout: verticaltree
name,manager,email,title"##;

/// Whether the title marks the person as a vendor
pub fn is_vendor(record: &NormalizedRecord) -> bool {
    record
        .title
        .as_deref()
        .is_some_and(|t| t.to_lowercase().contains("vendor"))
}

/// Render records in the configured format
///
/// Vendors are left out unless `include_vendors` is set. Returns the document
/// and the number of records it contains.
pub fn render(records: &[NormalizedRecord], settings: &OutputSettings) -> Result<(String, usize)> {
    let kept: Vec<&NormalizedRecord> = records
        .iter()
        .filter(|r| settings.include_vendors || !is_vendor(r))
        .collect();

    if kept.len() < records.len() {
        debug!(omitted = records.len() - kept.len(), "Vendor records omitted");
    }

    let document = match settings.format {
        OutputFormat::Drawio => {
            let template = match settings.template.as_deref() {
                Some(path) => load_template(Path::new(path))?,
                None => DEFAULT_TEMPLATE.to_string(),
            };
            render_drawio(&template, &kept)?
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&kept)?;
            json.push('\n');
            json
        }
    };

    Ok((document, kept.len()))
}

fn load_template(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::IoRead {
        path: path.to_path_buf(),
        source: e,
    })
}

fn render_drawio(template: &str, records: &[&NormalizedRecord]) -> Result<String> {
    let mut out = template.trim_end_matches(['\r', '\n']).to_string();
    out.push('\n');

    // Fields holding the delimiter, quotes or line breaks are quoted
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for record in records {
        let field = |v: &Option<String>| v.as_deref().unwrap_or_default().to_string();
        writer
            .write_record([
                field(&record.name),
                field(&record.manager),
                field(&record.email),
                field(&record.title),
            ])
            .map_err(|e| Error::Internal(format!("Failed to encode CSV row: {}", e)))?;
    }
    let rows = writer
        .into_inner()
        .map_err(|e| Error::Internal(format!("Failed to flush CSV rows: {}", e)))?;
    out.push_str(
        &String::from_utf8(rows)
            .map_err(|e| Error::Internal(format!("CSV rows are not UTF-8: {}", e)))?,
    );
    Ok(out)
}

/// Render and write the export, returning the number of records written
pub fn write_export(records: &[NormalizedRecord], settings: &OutputSettings) -> Result<usize> {
    let (document, count) = render(records, settings)?;

    match settings.file.as_deref() {
        Some(file) => {
            let path = PathBuf::from(file);
            fs::write(&path, document).map_err(|e| Error::IoWrite {
                path: path.clone(),
                source: e,
            })?;
            info!(path = %path.display(), records = count, "Org file written");
            if settings.format == OutputFormat::Drawio {
                info!("See the header of the file for how to import it into draw.io");
            }
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(document.as_bytes())?;
            handle.flush()?;
        }
    }

    Ok(count)
}
