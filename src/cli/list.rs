use anyhow::{anyhow, Result};
use clap::Args;
use serde_json::json;
use tracing::debug;

use super::OutputFormat;
use crate::api::UserRecord;
use crate::app::App;
use crate::config::MAX_PAGE_SIZE;
use crate::pagination::ListSnapshot;
use crate::utils::format::{fit_width, format_long_date, format_number};

const USER_WIDTH: usize = 36;
const METHOD_WIDTH: usize = 26;

/// Print one page of users
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Page to show, starting at 1
    #[arg(short = 'p', long = "page", default_value = "1")]
    pub page: usize,

    /// Users per page (defaults to the configured page size)
    #[arg(short = 'l', long = "limit")]
    pub limit: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

impl ListCommand {
    pub async fn execute(&self, app: &App) -> Result<()> {
        let limit = self.limit.unwrap_or(app.config().page_size);
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(anyhow!("--limit must be between 1 and {}", MAX_PAGE_SIZE));
        }
        if self.page == 0 {
            return Err(anyhow!("--page starts at 1"));
        }

        debug!(page = self.page, limit, "Listing users");
        let snapshot = app.list_page(self.page, limit).await?;

        match self.format {
            OutputFormat::Json => {
                let output = json!({
                    "tenant": app.config().tenant,
                    "offset": snapshot.offset,
                    "limit": snapshot.limit,
                    "estimatedCount": snapshot.estimated_count,
                    "hasNext": snapshot.can_go_next,
                    "users": snapshot.window,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                let reached = snapshot.offset / limit + 1;
                if reached < self.page {
                    eprintln!(
                        "Page {} is past the end of the list; showing page {}",
                        self.page, reached
                    );
                }
                print!("{}", render_table(&snapshot));
            }
        }
        Ok(())
    }
}

fn render_table(snapshot: &ListSnapshot<UserRecord>) -> String {
    if snapshot.window.is_empty() {
        return "No users found\n".to_string();
    }

    let mut out = format!(
        "{} {} {}\n",
        fit_width("USER", USER_WIDTH),
        fit_width("LOGIN METHOD", METHOD_WIDTH),
        "TIME JOINED"
    );
    for record in &snapshot.window {
        let joined = record
            .time_joined()
            .map(|joined| format_long_date(&joined))
            .unwrap_or_default();

        let line = format!(
            "{} {} {}",
            fit_width(&record.primary_label(), USER_WIDTH),
            fit_width(&record.login_method_label(), METHOD_WIDTH),
            joined
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    if snapshot.estimated_count > 0 {
        let (first, last) = snapshot.display_range();
        out.push_str(&format!(
            "\n{} - {} of {}\n",
            format_number(first),
            format_number(last),
            format_number(snapshot.estimated_count)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{EmailPasswordUser, ThirdPartyInfo, ThirdPartyUser};
    use std::collections::BTreeSet;

    fn snapshot(window: Vec<UserRecord>, offset: usize, estimated: usize) -> ListSnapshot<UserRecord> {
        ListSnapshot {
            cached_len: offset + window.len(),
            window,
            offset,
            limit: 2,
            estimated_count: estimated,
            is_loading: false,
            error_offsets: BTreeSet::new(),
            can_go_next: false,
            can_go_previous: offset > 0,
        }
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(render_table(&snapshot(vec![], 0, 0)), "No users found\n");
    }

    #[test]
    fn test_rows_and_footer() {
        let users = vec![
            UserRecord::EmailPassword(EmailPasswordUser {
                id: "u1".to_string(),
                email: "ada@example.com".to_string(),
                time_joined: Some(1_700_000_000_000),
                first_name: Some("Ada".to_string()),
                last_name: None,
            }),
            UserRecord::ThirdParty(ThirdPartyUser {
                id: "u2".to_string(),
                email: "grace@example.com".to_string(),
                third_party: ThirdPartyInfo {
                    id: "google".to_string(),
                    user_id: "g-1".to_string(),
                },
                time_joined: None,
                first_name: None,
                last_name: None,
            }),
        ];

        let table = render_table(&snapshot(users, 1000, 1500));
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("USER"));
        assert!(lines[1].starts_with("Ada "));
        assert!(lines[1].ends_with("14 Nov 2023, 22:13"));
        assert!(lines[2].contains("Third party - google"));
        assert_eq!(lines.last(), Some(&"1,001 - 1,002 of 1,500"));
    }
}
