//! Plain-text tables, detail views and JSON output

use crate::cli::OutputFormat;
use chrono::{DateTime, Utc};
use punter_protocol::{DashboardMetrics, DeliveryReport, MetricSummary};
use punter_types::{Admin, KycRequest, Transaction, User};
use serde::Serialize;
use std::io::{self, Write};

const DATE_FORMAT: &str = "%b %-d, %Y";

/// Writes command results in the selected format
#[derive(Debug)]
pub struct Renderer<W> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> Renderer<W> {
    /// Renderer over `out`
    pub const fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print a line of text regardless of the format
    pub fn line(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{}", text.as_ref())
    }

    /// Result of a write: `message` as text, or `record` as JSON
    pub fn outcome<T: Serialize + ?Sized>(&mut self, message: &str, record: &T) -> io::Result<()> {
        match self.format {
            OutputFormat::Table => self.line(message),
            OutputFormat::Json => self.json(record),
        }
    }

    fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, value)?;
        writeln!(self.out)
    }

    fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header: Vec<String> = headers.iter().map(ToString::to_string).collect();
        self.row(&header, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        self.row(&rule, &widths)?;
        for row in rows {
            self.row(row, &widths)?;
        }
        if rows.is_empty() {
            writeln!(self.out, "(no records)")?;
        }
        Ok(())
    }

    fn row(&mut self, cells: &[String], widths: &[usize]) -> io::Result<()> {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(self.out, "{}", line.trim_end())
    }

    fn fields(&mut self, fields: &[(&str, String)]) -> io::Result<()> {
        let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in fields {
            writeln!(self.out, "{key:<width$}  {value}")?;
        }
        Ok(())
    }

    /// User list
    pub fn users(&mut self, users: &[&User]) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(users);
        }
        let rows: Vec<Vec<String>> = users
            .iter()
            .map(|user| {
                vec![
                    user.id.clone(),
                    user.full_name(),
                    user.email.clone(),
                    user.role.to_string(),
                    user.status.to_string(),
                    date(&user.created_at),
                    user.balance.map_or_else(|| "-".to_string(), money),
                ]
            })
            .collect();
        self.table(
            &["ID", "NAME", "EMAIL", "ROLE", "STATUS", "JOINED", "BALANCE"],
            &rows,
        )
    }

    /// User detail
    pub fn user(&mut self, user: &User) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(user);
        }
        let mut fields = vec![
            ("Id", user.id.clone()),
            ("Name", user.full_name()),
            ("Username", user.username.clone()),
            ("Email", user.email.clone()),
            ("Role", user.role.to_string()),
            ("Status", user.status.to_string()),
            ("Verified", yes_no(user.is_verified)),
            ("Joined", date(&user.created_at)),
            ("Balance", user.balance.map_or_else(|| "-".to_string(), money)),
            ("Bio", user.bio.clone().unwrap_or_default()),
        ];
        for plan in &user.pricing_plans {
            fields.push(("Plan", format!("{} ({})", plan.name, money(plan.price))));
        }
        self.fields(&fields)
    }

    /// Transaction list
    pub fn transactions(&mut self, transactions: &[&Transaction]) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(transactions);
        }
        let rows: Vec<Vec<String>> = transactions
            .iter()
            .map(|tx| {
                vec![
                    tx.id.clone(),
                    date(&tx.created_at),
                    tx.kind.to_string(),
                    money(tx.amount),
                    tx.status.to_string(),
                    tx.description.clone().unwrap_or_default(),
                ]
            })
            .collect();
        self.table(
            &["ID", "DATE", "TYPE", "AMOUNT", "STATUS", "DESCRIPTION"],
            &rows,
        )
    }

    /// Transaction detail
    pub fn transaction(&mut self, tx: &Transaction) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(tx);
        }
        let mut fields = vec![
            ("Id", tx.id.clone()),
            ("Date", date(&tx.created_at)),
            ("Type", tx.kind.to_string()),
            ("Amount", money(tx.amount)),
            ("Status", tx.status.to_string()),
            ("Description", tx.description.clone().unwrap_or_default()),
            ("Merchant", tx.merchant.clone().unwrap_or_default()),
            ("Category", tx.category.clone().unwrap_or_default()),
            ("User", tx.user.clone().unwrap_or_default()),
        ];
        if let Some(bank) = &tx.details {
            fields.push(("Account name", bank.account_name.clone()));
            fields.push(("Account number", bank.account_number.clone()));
            fields.push(("Bank code", bank.bank_code.clone()));
        }
        self.fields(&fields)
    }

    /// KYC list
    pub fn kyc_requests(&mut self, requests: &[&KycRequest]) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(requests);
        }
        let rows: Vec<Vec<String>> = requests
            .iter()
            .map(|request| {
                vec![
                    request.id.clone(),
                    request.full_name(),
                    request.email.clone(),
                    request.id_type.clone(),
                    request.status.to_string(),
                    request
                        .created_at
                        .as_ref()
                        .map_or_else(|| "-".to_string(), date),
                ]
            })
            .collect();
        self.table(
            &["ID", "NAME", "EMAIL", "ID TYPE", "STATUS", "SUBMITTED"],
            &rows,
        )
    }

    /// KYC detail
    pub fn kyc_request(&mut self, request: &KycRequest) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(request);
        }
        self.fields(&[
            ("Id", request.id.clone()),
            ("User", request.user_id.clone()),
            ("Name", request.full_name()),
            ("Email", request.email.clone()),
            ("Phone", request.phone.clone().unwrap_or_default()),
            ("Address", request.address.clone().unwrap_or_default()),
            ("ID type", request.id_type.clone()),
            ("ID number", request.id_number.clone().unwrap_or_default()),
            ("ID front", request.id_photos.front.clone()),
            ("ID back", request.id_photos.back.clone()),
            ("Selfie", request.selfie.clone()),
            ("Status", request.status.to_string()),
            (
                "Submitted",
                request
                    .created_at
                    .as_ref()
                    .map_or_else(|| "-".to_string(), date),
            ),
            ("Notes", request.notes.clone().unwrap_or_default()),
        ])
    }

    /// Admin list
    pub fn admins(&mut self, admins: &[Admin]) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(admins);
        }
        let rows: Vec<Vec<String>> = admins
            .iter()
            .map(|admin| {
                vec![
                    admin.id.clone(),
                    format!("{} {}", admin.firstname, admin.lastname),
                    admin.email.clone(),
                ]
            })
            .collect();
        self.table(&["ID", "NAME", "EMAIL"], &rows)
    }

    /// Newly created admin, with the password the operator has to pass on
    pub fn created_admin(&mut self, admin: &Admin, password: &str) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(&serde_json::json!({ "admin": admin, "password": password }));
        }
        self.fields(&[
            ("Id", admin.id.clone()),
            ("Name", format!("{} {}", admin.firstname, admin.lastname)),
            ("Email", admin.email.clone()),
            ("Password", password.to_string()),
        ])
    }

    /// Dashboard cards and monthly series
    pub fn dashboard(&mut self, metrics: &DashboardMetrics) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(metrics);
        }
        self.card("Total Users", &metrics.users, false)?;
        self.card("Total Revenue", &metrics.revenue, true)?;
        self.card("Total Signals", &metrics.signals, false)
    }

    fn card(&mut self, title: &str, summary: &MetricSummary, currency: bool) -> io::Result<()> {
        let total = if currency {
            money(summary.total)
        } else {
            summary.total.to_string()
        };
        writeln!(
            self.out,
            "{title}: {total} ({:+}% vs last month)",
            summary.growth
        )?;
        for point in &summary.series {
            let value = if currency {
                money(point.value)
            } else {
                point.value.to_string()
            };
            writeln!(self.out, "  {:<4} {value}", point.label)?;
        }
        Ok(())
    }

    /// Accounts an email audience reaches
    pub fn recipients(&mut self, users: &[&User]) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(users);
        }
        let rows: Vec<Vec<String>> = users
            .iter()
            .map(|user| vec![user.id.clone(), user.full_name(), user.email.clone()])
            .collect();
        self.table(&["ID", "NAME", "EMAIL"], &rows)
    }

    /// Outcome of a send
    pub fn delivery(&mut self, report: &DeliveryReport) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(report);
        }
        writeln!(
            self.out,
            "Sent \"{}\" to {} ({} recipients)",
            report.subject,
            report.selection,
            report.delivered.len()
        )
    }
}

fn date(at: &DateTime<Utc>) -> String {
    at.format(DATE_FORMAT).to_string()
}

fn money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "yes" } else { "no" };
    text.to_string()
}
