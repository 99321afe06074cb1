use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use smcprims_client::{FanMode, FanReading, FanReport};
use smcprims_codec::{DataType, DecodedValue, Key, Value};

const VALUE_SCHEMA: &str = "https://schemas.3leaps.dev/smcprims/cli/v1/key-value.schema.json";
const LIST_SCHEMA: &str = "https://schemas.3leaps.dev/smcprims/cli/v1/key-list.schema.json";
const FANS_SCHEMA: &str = "https://schemas.3leaps.dev/smcprims/cli/v1/fan-report.schema.json";
const WRITE_SCHEMA: &str = "https://schemas.3leaps.dev/smcprims/cli/v1/key-written.schema.json";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ValueOutput {
    key: Key,
    data_type: DataType,
    size: usize,
    bytes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<DecodedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decode_error: Option<String>,
}

impl ValueOutput {
    fn from_value(value: &Value) -> Self {
        let (decoded, decode_error) = match value.decode() {
            Ok(decoded) => (Some(decoded), None),
            Err(err) => (None, Some(err.to_string())),
        };
        Self {
            key: value.key(),
            data_type: value.data_type(),
            size: value.size(),
            bytes: hex_bytes(value.bytes()),
            value: decoded,
            decode_error,
        }
    }

    fn display_value(&self) -> String {
        match (&self.value, &self.decode_error) {
            (Some(value), _) => value.to_string(),
            (None, Some(err)) => format!("<{err}>"),
            (None, None) => String::new(),
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_id: &'a str,
    #[serde(flatten)]
    body: T,
}

#[derive(Serialize)]
struct ListOutput {
    count: usize,
    keys: Vec<ValueOutput>,
}

#[derive(Serialize)]
struct WriteOutput {
    key: Key,
    size: usize,
    bytes: String,
    written: bool,
}

pub fn print_value(value: &Value, format: OutputFormat) {
    let out = ValueOutput::from_value(value);
    match format {
        OutputFormat::Json => print_json(&Envelope {
            schema_id: VALUE_SCHEMA,
            body: out,
        }),
        OutputFormat::Table => print_value_table(std::slice::from_ref(&out)),
        OutputFormat::Pretty => println!("{}", pretty_line(&out)),
        OutputFormat::Raw => println!("{}", out.bytes),
    }
}

pub fn print_values(values: &[Value], format: OutputFormat) {
    let rows: Vec<ValueOutput> = values.iter().map(ValueOutput::from_value).collect();
    match format {
        OutputFormat::Json => print_json(&Envelope {
            schema_id: LIST_SCHEMA,
            body: ListOutput {
                count: rows.len(),
                keys: rows,
            },
        }),
        OutputFormat::Table => print_value_table(&rows),
        OutputFormat::Pretty => {
            for row in &rows {
                println!("{}", pretty_line(row));
            }
        }
        OutputFormat::Raw => {
            for row in &rows {
                println!("{} {}", row.key, row.bytes);
            }
        }
    }
}

pub fn print_written(value: &Value, format: OutputFormat) {
    let out = WriteOutput {
        key: value.key(),
        size: value.size(),
        bytes: hex_bytes(value.bytes()),
        written: true,
    };
    match format {
        OutputFormat::Json => print_json(&Envelope {
            schema_id: WRITE_SCHEMA,
            body: out,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KEY", "SIZE", "BYTES"])
                .add_row(vec![out.key.to_string(), out.size.to_string(), out.bytes]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("wrote {} ({} bytes: {})", out.key, out.size, out.bytes);
        }
        OutputFormat::Raw => {}
    }
}

pub fn print_fan_report(report: &FanReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&Envelope {
            schema_id: FANS_SCHEMA,
            body: report,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    "FAN", "ACTUAL", "MINIMUM", "MAXIMUM", "SAFE", "TARGET", "MODE",
                ]);
            for fan in &report.fans {
                table.add_row(vec![
                    fan.index.to_string(),
                    speed(fan.actual),
                    speed(fan.minimum),
                    speed(fan.maximum),
                    speed(fan.safe),
                    speed(fan.target),
                    mode(fan.mode).to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            println!("Total fans in system: {}", report.total);
            for fan in &report.fans {
                print_fan_pretty(fan);
            }
        }
    }
}

fn print_fan_pretty(fan: &FanReading) {
    println!();
    println!("Fan #{}:", fan.index);
    println!("    Actual speed : {}", speed(fan.actual));
    println!("    Minimum speed: {}", speed(fan.minimum));
    println!("    Maximum speed: {}", speed(fan.maximum));
    println!("    Safe speed   : {}", speed(fan.safe));
    println!("    Target speed : {}", speed(fan.target));
    println!("    Mode         : {}", mode(fan.mode));
}

fn print_value_table(rows: &[ValueOutput]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["KEY", "TYPE", "SIZE", "VALUE", "BYTES"]);
    for row in rows {
        table.add_row(vec![
            row.key.to_string(),
            row.data_type.to_string(),
            row.size.to_string(),
            row.display_value(),
            row.bytes.clone(),
        ]);
    }
    println!("{table}");
}

fn pretty_line(row: &ValueOutput) -> String {
    format!(
        "{} [{}] {} (bytes {})",
        row.key,
        row.data_type,
        row.display_value(),
        row.bytes
    )
}

fn print_json<T: Serialize>(out: &T) {
    println!(
        "{}",
        serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
    );
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn speed(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.0}"))
}

fn mode(mode: Option<FanMode>) -> &'static str {
    match mode {
        Some(FanMode::Auto) => "auto",
        Some(FanMode::Forced) => "forced",
        None => "-",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_line_shows_type_value_and_bytes() {
        let key: Key = "F0Ac".parse().unwrap();
        let value = Value::new(key, DataType::FPE2, &[0x1f, 0x38]).unwrap();
        let row = ValueOutput::from_value(&value);
        assert_eq!(pretty_line(&row), "F0Ac [fpe2] 1998 (bytes 1f 38)");
    }

    #[test]
    fn undecodable_value_keeps_bytes() {
        let key: Key = "ODD!".parse().unwrap();
        let value = Value::new(key, DataType::from_bytes(*b"fpzz"), &[0, 1]).unwrap();
        let json = serde_json::to_value(ValueOutput::from_value(&value)).unwrap();
        assert_eq!(json["bytes"], "00 01");
        assert!(json.get("value").is_none());
        assert!(json["decode_error"].is_string());
    }

    #[test]
    fn envelope_flattens_body() {
        let report = FanReport {
            total: 0,
            fans: Vec::new(),
        };
        let json = serde_json::to_value(Envelope {
            schema_id: FANS_SCHEMA,
            body: &report,
        })
        .unwrap();
        assert_eq!(json["schema_id"], FANS_SCHEMA);
        assert_eq!(json["total"], 0);
    }

    #[test]
    fn missing_speed_renders_dash() {
        assert_eq!(speed(None), "-");
        assert_eq!(speed(Some(2160.0)), "2160");
        assert_eq!(mode(Some(FanMode::Forced)), "forced");
    }
}
