use std::sync::Arc;

use anyhow::Context;
use litsearch_core::{update, AppState, AppViewModel, Msg};
use litsearch_engine::{EngineHandle, HttpBackend};
use litsearch_logging::{lit_debug, lit_info};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::effects::{map_event, EffectRunner};
use crate::render::{prompt, Renderer};

/// How the session begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartMode {
    /// Show the build form and wait for a subject.
    Prompt,
    /// Submit this subject right away.
    Subject(String),
    /// Go straight to the conversation screen.
    Chat,
}

impl StartMode {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.chat {
            return StartMode::Chat;
        }
        match &cli.subject {
            Some(subject) if !subject.trim().is_empty() => StartMode::Subject(subject.clone()),
            _ => StartMode::Prompt,
        }
    }
}

struct App {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
    stdout: Stdout,
    /// A prompt is on screen without a trailing newline.
    prompt_visible: bool,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        lit_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
    }

    async fn render_if_dirty(&mut self) -> anyhow::Result<()> {
        if !self.state.consume_dirty() {
            return Ok(());
        }
        let lines = self.renderer.render(&self.state.view());
        if lines.is_empty() {
            return Ok(());
        }
        let mut text = String::new();
        if std::mem::take(&mut self.prompt_visible) {
            text.push('\n');
        }
        for line in lines {
            text.push_str(&line);
            text.push('\n');
        }
        self.write(&text).await
    }

    async fn show_prompt(&mut self, view: &AppViewModel) -> anyhow::Result<bool> {
        let Some(prompt) = prompt(view) else {
            return Ok(false);
        };
        if !self.prompt_visible {
            self.write(prompt).await?;
            self.prompt_visible = true;
        }
        Ok(true)
    }

    async fn write(&mut self, text: &str) -> anyhow::Result<()> {
        self.stdout
            .write_all(text.as_bytes())
            .await
            .context("writing to stdout")?;
        self.stdout.flush().await.context("flushing stdout")
    }
}

fn input_msg(view: &AppViewModel, line: String) -> Msg {
    match view {
        AppViewModel::Build(_) => Msg::SubjectSubmitted(line),
        AppViewModel::Conversation(_) => Msg::QuestionSubmitted(line),
    }
}

/// Runs the interactive session until end of input, Ctrl-C or an I/O failure.
pub async fn run(config: &ClientConfig, start: StartMode) -> anyhow::Result<()> {
    let backend = HttpBackend::new(config.api_settings())
        .with_context(|| format!("configuring backend client for {}", config.api_base_url))?;
    let (engine, mut events) = EngineHandle::new(Arc::new(backend));
    let runner = EffectRunner::new(engine);
    runner.check_health();

    let mut app = App {
        state: AppState::new().with_poll_interval(config.poll_interval()),
        runner,
        renderer: Renderer::new(),
        stdout: tokio::io::stdout(),
        prompt_visible: false,
    };

    match start {
        StartMode::Prompt => {}
        StartMode::Subject(subject) => app.dispatch(Msg::SubjectSubmitted(subject)),
        StartMode::Chat => app.dispatch(Msg::OpenConversation),
    }
    app.render_if_dirty().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let result = loop {
        if app.state.is_closed() {
            break Ok(());
        }
        let view = app.state.view();
        let accepting = match app.show_prompt(&view).await {
            Ok(accepting) => accepting,
            Err(err) => break Err(err),
        };

        tokio::select! {
            line = lines.next_line(), if accepting => {
                app.prompt_visible = false;
                match line {
                    Ok(Some(line)) => app.dispatch(input_msg(&view, line)),
                    Ok(None) => {
                        lit_info!("End of input; shutting down");
                        app.dispatch(Msg::Shutdown);
                    }
                    Err(err) => break Err(anyhow::Error::new(err).context("reading stdin")),
                }
            }
            Some(event) = events.recv() => app.dispatch(map_event(event)),
            _ = tokio::signal::ctrl_c() => {
                lit_info!("Interrupted; shutting down");
                app.dispatch(Msg::Shutdown);
            }
        }

        if let Err(err) = app.render_if_dirty().await {
            break Err(err);
        }
    };

    app.runner.shutdown();
    if app.prompt_visible {
        let _ = app.write("\n").await;
    }
    result
}
