//! Interactive session: one in-memory store for the life of the process.
//!
//! Line grammar (whitespace separated, category is a single word):
//!   add <income|expense> <amount> <category> <yyyy-mm-dd> [--recurring] [notes...]
//!   edit <id> <income|expense> <amount> <category> <yyyy-mm-dd> [--recurring] [notes...]
//!   delete <id>
//!   list
//!   dashboard [yyyy-mm | <from> <to> | all]
//!   export [path]
//!   advise <goals...>
//!   help | quit
//!
//! `advise` runs in the background on a copy of the request; the store keeps
//! taking commands until the answer is printed.

use anyhow::{Context, Result};
use saldo_advisor::{AdviceGateway, AdviceResponse, Advisor};
use saldo_core::{
    export_csv_string, summarize, validate, validate_replacement, TransactionId, TransactionInput,
    TransactionStore,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::render;
use crate::window_arg;

pub const HELP: &str = "\
commands:
  add <income|expense> <amount> <category> <yyyy-mm-dd> [--recurring] [notes...]
  edit <id> <income|expense> <amount> <category> <yyyy-mm-dd> [--recurring] [notes...]
  delete <id>
  list
  dashboard [yyyy-mm | <from> <to> | all]
  export [path]
  advise <goals...>
  help
  quit
";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Add(TransactionInput),
    Edit(String, TransactionInput),
    Delete(String),
    List,
    Dashboard(Vec<String>),
    Export(Option<String>),
    Advise(String),
    Help,
    Quit,
}

fn parse_input(args: &[&str]) -> Result<TransactionInput, String> {
    let [kind, amount, category, date, rest @ ..] = args else {
        return Err("expected: <income|expense> <amount> <category> <yyyy-mm-dd>".to_string());
    };
    let (is_recurring, notes) = match rest {
        ["--recurring", notes @ ..] => (true, notes),
        notes => (false, notes),
    };
    Ok(TransactionInput {
        kind: kind.to_string(),
        amount: amount.to_string(),
        category: category.to_string(),
        date: date.to_string(),
        is_recurring,
        notes: (!notes.is_empty()).then(|| notes.join(" ")),
    })
}

pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((head, args)) = words.split_first() else {
        return Ok(None);
    };

    let cmd = match *head {
        "add" => ShellCommand::Add(parse_input(args)?),
        "edit" => {
            let Some((id, rest)) = args.split_first() else {
                return Err("usage: edit <id> ...".to_string());
            };
            ShellCommand::Edit(id.to_string(), parse_input(rest)?)
        }
        "delete" | "rm" => match args {
            [id] => ShellCommand::Delete(id.to_string()),
            _ => return Err("usage: delete <id>".to_string()),
        },
        "list" | "ls" => ShellCommand::List,
        "dashboard" => ShellCommand::Dashboard(args.iter().map(|a| a.to_string()).collect()),
        "export" => ShellCommand::Export(args.first().map(|p| p.to_string())),
        "advise" => ShellCommand::Advise(args.join(" ")),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(cmd))
}

pub struct Shell<G> {
    store: TransactionStore,
    advisor: Result<Arc<Advisor<G>>, String>,
    advice_tx: mpsc::UnboundedSender<String>,
    advice_rx: mpsc::UnboundedReceiver<String>,
    pending_advice: usize,
}

enum Input {
    Line(Option<String>),
    Advice(String),
}

fn render_advice(advice: &AdviceResponse) -> String {
    let mut s = format!("## Analysis\n\n{}\n\n## Suggestions\n\n", advice.analysis);
    for item in &advice.suggestions {
        s.push_str(&format!("- {item}\n"));
    }
    s
}

impl<G: AdviceGateway + 'static> Shell<G> {
    /// `advisor` is Err with a reason when advice is unavailable this session.
    pub fn new(mut store: TransactionStore, advisor: Result<Advisor<G>, String>) -> Self {
        store.subscribe(|event, list| {
            tracing::info!(?event, transactions = list.len(), "store changed");
        });
        let (advice_tx, advice_rx) = mpsc::unbounded_channel();
        Self {
            store,
            advisor: advisor.map(Arc::new),
            advice_tx,
            advice_rx,
            pending_advice: 0,
        }
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    /// Run one command, returning the text to show.
    ///
    /// `advise` returns at once; the answer arrives through [`Shell::next_advice`].
    pub async fn execute(&mut self, cmd: ShellCommand) -> Result<String> {
        let out = match cmd {
            ShellCommand::Add(input) => match validate(&input) {
                Ok(candidate) => {
                    let t = self.store.add(candidate);
                    format!("added {}\n", t.id)
                }
                Err(e) => format!("{e}\n"),
            },
            ShellCommand::Edit(id, input) => {
                let id = TransactionId::from(id);
                if self.store.get(&id).is_none() {
                    // the store would ignore it; tell the user instead
                    format!("no transaction with id {id}\n")
                } else {
                    match validate_replacement(id.clone(), &input) {
                        Ok(t) => {
                            self.store.update(t);
                            format!("updated {id}\n")
                        }
                        Err(e) => format!("{e}\n"),
                    }
                }
            }
            ShellCommand::Delete(id) => match self.store.delete(&TransactionId::from(id.as_str())) {
                Some(t) => format!("deleted {}\n", t.id),
                None => format!("no transaction with id {id}\n"),
            },
            ShellCommand::List => render::transaction_table(self.store.list()),
            ShellCommand::Dashboard(args) => match window_arg::parse_window_args(&args) {
                Ok(window) => {
                    let summary = summarize(self.store.list(), &window);
                    render::dashboard(&summary, &window)
                }
                Err(e) => format!("{e:#}\n"),
            },
            ShellCommand::Export(None) => export_csv_string(self.store.list())?,
            ShellCommand::Export(Some(path)) => {
                let csv = export_csv_string(self.store.list())?;
                tokio::fs::write(&path, csv)
                    .await
                    .with_context(|| format!("write {path}"))?;
                format!("exported {} transactions to {path}\n", self.store.len())
            }
            ShellCommand::Advise(goals) => self.advise(&goals),
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Quit => String::new(),
        };
        Ok(out)
    }

    /// Check the request against the current store, then send it in the
    /// background. The spawned task owns its own copy of the request.
    fn advise(&mut self, goals: &str) -> String {
        let advisor = match &self.advisor {
            Ok(a) => Arc::clone(a),
            Err(reason) => return format!("advice unavailable: {reason}\n"),
        };
        let request = match advisor.prepare(self.store.list(), goals) {
            Ok(r) => r,
            Err(e) => return format!("{}\n", e.user_notice()),
        };

        let tx = self.advice_tx.clone();
        tokio::spawn(async move {
            let text = match advisor.submit(request).await {
                Ok(advice) => render_advice(&advice),
                Err(e) => format!("{}\n", e.user_notice()),
            };
            // receiver gone means the session ended first
            let _ = tx.send(text);
        });
        self.pending_advice += 1;
        "asking for advice; the answer will appear here when ready\n".to_string()
    }

    /// Wait for the next finished advice request, or None when none is pending.
    pub async fn next_advice(&mut self) -> Option<String> {
        if self.pending_advice == 0 {
            return None;
        }
        let text = self.advice_rx.recv().await?;
        self.pending_advice -= 1;
        Some(text)
    }

    /// Read commands from stdin until `quit` or end of input, printing advice
    /// as it completes.
    pub async fn run(&mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        stdout.write_all(b"saldo shell. type `help` for commands.\n> ").await?;
        stdout.flush().await?;

        loop {
            let input = tokio::select! {
                line = lines.next_line() => Input::Line(line.context("read stdin")?),
                Some(text) = self.advice_rx.recv() => Input::Advice(text),
            };

            let out = match input {
                Input::Line(None) => break,
                Input::Line(Some(line)) => match parse_command(&line) {
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(cmd)) => self.execute(cmd).await.unwrap_or_else(|e| format!("error: {e:#}\n")),
                    Ok(None) => String::new(),
                    Err(msg) => format!("{msg}\n"),
                },
                Input::Advice(text) => {
                    self.pending_advice = self.pending_advice.saturating_sub(1);
                    format!("\n{text}")
                }
            };
            stdout.write_all(out.as_bytes()).await?;
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
        }
        if self.pending_advice > 0 {
            tracing::info!(pending = self.pending_advice, "advice requests dropped at exit");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saldo_advisor::{AdviceRequest, CannedGateway, GatewayError};
    use saldo_core::demo_transactions;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio::time::timeout;

    fn shell() -> Shell<CannedGateway> {
        let advice = AdviceResponse {
            analysis: "Tudo certo.".to_string(),
            suggestions: vec!["Guarde 10%.".to_string()],
        };
        Shell::new(
            TransactionStore::new(),
            Ok(Advisor::new(CannedGateway::replying(advice))),
        )
    }

    #[test]
    fn test_parse_add_with_flags_and_notes() {
        let cmd = parse_command("add expense 120.5 Transporte 2024-05-15 --recurring Gasolina do mês")
            .unwrap()
            .unwrap();
        let ShellCommand::Add(input) = cmd else { panic!("not an add") };
        assert_eq!(input.kind, "expense");
        assert_eq!(input.amount, "120.5");
        assert!(input.is_recurring);
        assert_eq!(input.notes.as_deref(), Some("Gasolina do mês"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert!(parse_command("add expense 10").is_err());
        assert!(parse_command("delete").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[tokio::test]
    async fn test_session_add_edit_delete() {
        let mut sh = shell();
        let out = sh
            .execute(parse_command("add income 5000 Salário 2024-05-05").unwrap().unwrap())
            .await
            .unwrap();
        assert!(out.starts_with("added "));
        let id = sh.store().list()[0].id.to_string();

        let out = sh
            .execute(
                parse_command(&format!("edit {id} income 5200 Salário 2024-05-06"))
                    .unwrap()
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(out, format!("updated {id}\n"));
        assert_eq!(sh.store().list()[0].amount, 5200.0);

        let out = sh.execute(ShellCommand::Delete(id.clone())).await.unwrap();
        assert_eq!(out, format!("deleted {id}\n"));
        assert!(sh.store().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_reports_fields() {
        let mut sh = shell();
        let out = sh
            .execute(parse_command("add expense -5 Lazer 2024-05-20").unwrap().unwrap())
            .await
            .unwrap();
        assert!(out.contains("amount: must be positive"));
        assert!(sh.store().is_empty());
    }

    #[tokio::test]
    async fn test_advise_guard_and_success() {
        let mut sh = shell();
        let out = sh
            .execute(ShellCommand::Advise("Quero comprar uma casa".to_string()))
            .await
            .unwrap();
        assert!(out.starts_with("Not enough data"));
        assert_eq!(sh.next_advice().await, None);

        for line in [
            "add income 5000 Salário 2024-05-05",
            "add expense 800 Moradia 2024-05-10",
        ] {
            sh.execute(parse_command(line).unwrap().unwrap()).await.unwrap();
        }
        let out = sh
            .execute(ShellCommand::Advise("Quero comprar uma casa".to_string()))
            .await
            .unwrap();
        assert!(out.starts_with("asking for advice"));

        let advice = sh.next_advice().await.unwrap();
        assert!(advice.contains("Tudo certo."));
        assert!(advice.contains("- Guarde 10%."));
        assert_eq!(sh.next_advice().await, None);
    }

    /// Holds every request until released, then reports how many expenses it saw.
    struct HeldGateway {
        release: Arc<Notify>,
    }

    impl AdviceGateway for HeldGateway {
        async fn get_advice(&self, request: &AdviceRequest) -> Result<AdviceResponse, GatewayError> {
            self.release.notified().await;
            Ok(AdviceResponse {
                analysis: format!("{} despesas analisadas", request.expenses.len()),
                suggestions: vec![],
            })
        }
    }

    #[tokio::test]
    async fn test_store_takes_commands_while_advice_is_outstanding() {
        let release = Arc::new(Notify::new());
        let gateway = HeldGateway {
            release: Arc::clone(&release),
        };
        let mut sh = Shell::new(
            TransactionStore::with_transactions(demo_transactions()),
            Ok(Advisor::new(gateway)),
        );

        let out = sh
            .execute(ShellCommand::Advise("Quero quitar o cartão".to_string()))
            .await
            .unwrap();
        assert!(out.starts_with("asking for advice"));

        let add = parse_command("add expense 45 Saúde 2024-05-30").unwrap().unwrap();
        let out = timeout(Duration::from_secs(1), sh.execute(add))
            .await
            .expect("add waited on the advice request")
            .unwrap();
        assert!(out.starts_with("added "));
        assert_eq!(sh.store().len(), 7);

        let first = sh.store().list()[0].id.to_string();
        let out = sh.execute(ShellCommand::Delete(first.clone())).await.unwrap();
        assert_eq!(out, format!("deleted {first}\n"));
        assert!(sh.advice_rx.try_recv().is_err());

        release.notify_one();
        let advice = timeout(Duration::from_secs(1), sh.next_advice())
            .await
            .unwrap()
            .unwrap();
        // the request was taken before the add, so it holds the four demo expenses
        assert!(advice.contains("4 despesas analisadas"));
    }

    #[tokio::test]
    async fn test_export_to_stdout() {
        let mut sh = shell();
        sh.execute(parse_command("add expense 350 Alimentação 2024-05-12").unwrap().unwrap())
            .await
            .unwrap();
        let out = sh.execute(ShellCommand::Export(None)).await.unwrap();
        assert!(out.starts_with("id,type,amount,category,date,recurring,notes\n"));
        assert!(out.contains(",expense,350,Alimentação,2024-05-12,false,"));
    }
}
