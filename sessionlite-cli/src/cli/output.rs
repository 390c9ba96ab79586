// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Session formatting for CLI output

use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use sessionlite::{SessionPayload, SessionRecord, Value};

use super::commands::OutputFormat;

/// Formatter for session listings and single sessions
pub struct SessionFormatter;

impl SessionFormatter {
    /// Format a list of stored sessions
    pub fn format_list(records: &[SessionRecord], now: i64, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::list_table(records, now),
            OutputFormat::Json => Self::list_json(records, now),
        }
    }

    /// Format one decoded session
    pub fn format_session(
        record: &SessionRecord,
        payload: &SessionPayload,
        format: OutputFormat,
    ) -> String {
        match format {
            OutputFormat::Table => Self::session_table(record, payload),
            OutputFormat::Json => Self::session_json(record, payload),
        }
    }

    fn list_table(records: &[SessionRecord], now: i64) -> String {
        if records.is_empty() {
            return format!("{}\n", "No sessions found".yellow());
        }

        let mut output = String::new();
        output.push_str(&format!("{}\n", "Sessions".bold().green()));
        output.push_str(&format!("Rows: {}\n\n", records.len()));

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("id").fg(Color::Green),
            Cell::new("last activity").fg(Color::Green),
            Cell::new("idle (s)").fg(Color::Green),
            Cell::new("payload bytes").fg(Color::Green),
        ]);

        for record in records {
            table.add_row(vec![
                record.id.clone(),
                Self::timestamp(record.last_activity),
                record.idle_seconds(now).to_string(),
                record.payload.len().to_string(),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    fn list_json(records: &[SessionRecord], now: i64) -> String {
        let json = serde_json::json!({
            "status": "success",
            "sessions": records.iter().map(|record| serde_json::json!({
                "id": record.id,
                "last_activity": record.last_activity,
                "idle_seconds": record.idle_seconds(now),
                "payload_bytes": record.payload.len(),
            })).collect::<Vec<_>>(),
            "count": records.len(),
        });
        Self::pretty(&json)
    }

    fn session_table(record: &SessionRecord, payload: &SessionPayload) -> String {
        let mut output = String::new();
        output.push_str(&format!("{} {}\n", "Session".bold().green(), record.id));
        output.push_str(&format!(
            "Last activity: {}\n\n",
            Self::timestamp(record.last_activity)
        ));

        if payload.attributes.is_empty() {
            output.push_str(&format!("{}\n", "No attributes".yellow()));
            return output;
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("key").fg(Color::Green),
            Cell::new("type").fg(Color::Green),
            Cell::new("value").fg(Color::Green),
            Cell::new("flash").fg(Color::Green),
        ]);

        for (key, value) in &payload.attributes {
            let flash = if payload.new_flash.contains(key) {
                "new"
            } else if payload.old_flash.contains(key) {
                "old"
            } else {
                ""
            };
            table.add_row(vec![
                key.clone(),
                value.type_name().to_string(),
                Self::value_to_string(value),
                flash.to_string(),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    fn session_json(record: &SessionRecord, payload: &SessionPayload) -> String {
        let attributes: serde_json::Map<String, serde_json::Value> = payload
            .attributes
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();

        let json = serde_json::json!({
            "status": "success",
            "id": record.id,
            "last_activity": record.last_activity,
            "attributes": attributes,
            "new_flash": payload.new_flash,
            "old_flash": payload.old_flash,
        });
        Self::pretty(&json)
    }

    fn pretty(json: &serde_json::Value) -> String {
        let mut text = serde_json::to_string_pretty(json).unwrap_or_else(|_| {
            "{\"status\": \"error\", \"error\": \"Could not serialize output to JSON\"}".to_string()
        });
        text.push('\n');
        text
    }

    fn timestamp(seconds: i64) -> String {
        chrono::DateTime::from_timestamp(seconds, 0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| seconds.to_string())
    }

    fn value_to_string(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Null => "NULL".to_string(),
            Value::List(items) => format!(
                "[{}]",
                items
                    .iter()
                    .map(Self::value_to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            other => other.to_string(),
        }
    }
}
