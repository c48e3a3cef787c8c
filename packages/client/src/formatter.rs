//! Push formatting utilities for the dashboard display.

use chrono::FixedOffset;
use reportcast_server::infrastructure::dto::websocket::{
    MetricsDto, ReportDto, ReportPageDto, ServerEvent,
};
use reportcast_shared::time::to_rfc3339_in;

const RULE: &str = "============================================================";

/// Formatter for server pushes
pub struct DashboardFormatter;

impl DashboardFormatter {
    /// Format any server event
    ///
    /// # Arguments
    ///
    /// * `event` - The decoded server event
    /// * `offset` - Offset used to display timestamps
    pub fn format_event(event: &ServerEvent, offset: FixedOffset) -> String {
        match event {
            ServerEvent::Authenticated => "\n✓ Authenticated\n".to_string(),
            ServerEvent::Error(payload) => {
                format!("\n! {} error: {}\n", payload.r#type, payload.message)
            }
            ServerEvent::NewReport(report) => Self::format_report("+ new", report, offset),
            ServerEvent::ReportUpdate(report) => Self::format_report("~ updated", report, offset),
            ServerEvent::ReportDeleted(deleted) => {
                format!("\n- deleted {} (unit {})\n", deleted.id, deleted.unit_id)
            }
            ServerEvent::Metrics(metrics) => Self::format_metrics(metrics),
            ServerEvent::InitialRecentReports(page) => {
                Self::format_page("Today's reports", page, offset)
            }
            ServerEvent::AnnualReports(page) => Self::format_page("This year's reports", page, offset),
        }
    }

    /// Format a single report line
    pub fn format_report(label: &str, report: &ReportDto, offset: FixedOffset) -> String {
        let unit = report.unit_name.as_deref().unwrap_or(&report.unit_id);
        format!(
            "\n{} [{}] {} ({}, {}) @ {} in {}, created at {}\n",
            label,
            report.id,
            report.title,
            report.status,
            report.priority,
            report.location,
            unit,
            to_rfc3339_in(report.created_at, offset)
        )
    }

    /// Format a metrics snapshot as a small table
    pub fn format_metrics(metrics: &MetricsDto) -> String {
        format!(
            "\n{RULE}\n\
             Metrics ({})\n\
             total {} | pending {} | in progress {} | completed {}\n\
             priority low {} | medium {} | high {}\n\
             {RULE}\n",
            metrics.scope,
            metrics.total_reports,
            metrics.reports_pending,
            metrics.reports_in_progress,
            metrics.reports_completed,
            metrics.low_priority_reports,
            metrics.medium_priority_reports,
            metrics.high_priority_reports,
        )
    }

    /// Format a page of reports
    pub fn format_page(title: &str, page: &ReportPageDto, offset: FixedOffset) -> String {
        let mut output = format!(
            "\n{RULE}\n{} (page {}/{}, {} total):\n",
            title,
            page.page,
            page.number_of_pages.max(1),
            page.count
        );

        if page.data.is_empty() {
            output.push_str("(No reports)\n");
        } else {
            for report in &page.data {
                output.push_str(Self::format_report("*", report, offset).trim_start());
            }
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format the prompt help
    pub fn format_help() -> String {
        "\nCommands: recent | annual | metrics | help\n".to_string()
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when decoding fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
