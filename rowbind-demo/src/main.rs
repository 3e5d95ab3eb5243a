use std::fs::File;
use std::sync::Arc;
use std::time::Duration;

use log::info;
use rowbind::host::row_insets;
use rowbind::prelude::*;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
struct Todo {
    id: String,
    title: String,
    done: bool,
}

impl Todo {
    fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            done: false,
        }
    }
}

impl RowModel for Todo {
    fn id(&self) -> RowId {
        RowId::new(&self.id)
    }
}

/// Points of row spacing per blank text line.
const POINTS_PER_LINE: f32 = 4.0;

/// Prints every update it is handed.
#[derive(Default)]
struct TextHost {
    rows: Vec<Row<Todo>>,
    spacing: f32,
}

impl TextHost {
    fn print(&self) {
        let (top, bottom) = row_insets(self.spacing);
        let padding = |inset: f32| "\n".repeat((inset / POINTS_PER_LINE).round() as usize);
        for (index, row) in self.rows.iter().enumerate() {
            let todo = row.payload();
            let mark = if todo.done { "x" } else { " " };
            print!("{}", padding(top));
            println!("  {index}. [{mark}] {}", todo.title);
            print!("{}", padding(bottom));
        }
    }
}

impl PresentationHost<Todo> for TextHost {
    fn apply(&mut self, update: HostUpdate<Todo>, animation: Animation, done: Completion) {
        match &update {
            HostUpdate::Script(script) => println!(
                "render ({animation:?}): +{} -{} ~{} moves {}",
                script.inserts(),
                script.deletes(),
                script.updates(),
                script.moves()
            ),
            HostUpdate::Move { id, placement } => println!("move {id} {placement:?}"),
            HostUpdate::Delete { id } => println!("delete {id}"),
            HostUpdate::Reload => println!("reload ({animation:?})"),
        }
        update.apply_to(&mut self.rows);
        self.print();
        done.complete();
    }

    fn set_row_spacing(&mut self, spacing: f32) {
        self.spacing = spacing;
    }

    fn set_title_bar(&mut self, bar: &TitleBar) {
        if bar.has_title_area && bar.revealed {
            let button = bar.icon(BarSide::Right).unwrap_or("");
            println!("== {} == {button}", bar.title);
        }
    }
}

fn init_logging(verbose: bool) {
    let log_file = File::create("rowbind-demo.log").expect("Failed to create log file");
    let mut loggers: Vec<Box<dyn SharedLogger>> =
        vec![WriteLogger::new(LevelFilter::Debug, Config::default(), log_file)];
    if verbose {
        loggers.push(TermLogger::new(
            LevelFilter::Debug,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    CombinedLogger::init(loggers).expect("Failed to initialize logger");
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::main]
async fn main() {
    init_logging(std::env::args().any(|arg| arg == "--verbose"));

    let (todos_tx, todos_rx) = watch::channel(vec![
        Todo::new("milk", "Buy milk"),
        Todo::new("mail", "Answer mail"),
        Todo::new("plants", "Water plants"),
    ]);
    let todos_tx = Arc::new(todos_tx);
    let (title_tx, title_rx) = watch::channel("Today".to_string());
    let (_reorder_tx, reorder_rx) = watch::channel(true);

    let binding = TableBinding::new(todos_rx, TextHost::default())
        .title(title_rx)
        .row_spacing(8.0)
        .reorder_enabled(reorder_rx)
        .on_tap(|id| println!("tapped {id}"))
        .on_move({
            let todos = Arc::clone(&todos_tx);
            move |from, to| {
                println!("owner: moved {from} -> {to}");
                todos.send_modify(|list| {
                    if from < list.len() {
                        let todo = list.remove(from);
                        let to = to.min(list.len());
                        list.insert(to, todo);
                    }
                });
            }
        })
        .on_delete({
            let todos = Arc::clone(&todos_tx);
            move |id| {
                println!("owner: delete {id}");
                todos.send_modify(|list| list.retain(|todo| todo.id != id.as_str()));
            }
        })
        .right_bar_item("plus", || println!("owner: add"))
        .additional_context_menu_items(vec![
            ContextMenuItem::action("Pin", |id| println!("owner: pin {id}"))
                .icon("pin")
                .should_appear(|id| id != "milk"),
        ]);
    let gestures = binding.gestures();
    let shutdown = binding.shutdown_token();
    let driver = tokio::spawn(binding.run());
    settle().await;

    gestures.move_row(0, 2);
    settle().await;

    gestures.tap("mail");
    if let Some(menu) = gestures.open_menu("mail").await
        && let Some(pin) = menu.find("Pin")
    {
        gestures.select_menu_item(pin.id());
    }
    settle().await;

    todos_tx.send_modify(|todos| {
        if let Some(todo) = todos.iter_mut().find(|todo| todo.id == "plants") {
            todo.done = true;
        }
        todos.push(Todo::new("bills", "Pay bills"));
    });
    title_tx
        .send("Today (4)".to_string())
        .expect("Binding stopped early");
    settle().await;

    gestures.swipe_delete(0);
    settle().await;

    shutdown.cancel();
    let adapter = driver.await.expect("Binding task panicked");
    info!("Demo finished with {} rows", adapter.rows().len());
}
