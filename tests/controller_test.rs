use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use glide::controller::{serve, ExecutionController, RuntimeRequest, NOT_READY_NOTICE};
use glide::execution::{Bindings, Interpreter, RuntimeError};
use glide::page::{Page, RunStatus};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Output(String),
    Status(RunStatus),
    RunEnabled(bool),
    Variables(String),
    Input(String),
    Version(String),
}

/// Page that records every call and answers input prompts from a script.
#[derive(Clone, Default)]
struct RecordingPage {
    calls: Arc<Mutex<Vec<Call>>>,
    answers: Arc<Mutex<Vec<Option<String>>>>,
}

impl RecordingPage {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Page for RecordingPage {
    fn append_output(&mut self, text: Option<&str>) {
        if let Some(text) = text {
            self.push(Call::Output(text.to_string()));
        }
    }

    fn set_status(&mut self, status: RunStatus) {
        self.push(Call::Status(status));
    }

    fn set_run_enabled(&mut self, enabled: bool) {
        self.push(Call::RunEnabled(enabled));
    }

    fn show_variables(&mut self, rendered: String) {
        self.push(Call::Variables(rendered));
    }

    fn set_runtime_version(&mut self, version: &str) {
        self.push(Call::Version(version.to_string()));
    }

    fn request_input(&mut self, prompt: &str) -> oneshot::Receiver<Option<String>> {
        self.push(Call::Input(prompt.to_string()));
        let (tx, rx) = oneshot::channel();
        let answer = self.answers.lock().unwrap().pop().flatten();
        tx.send(answer).unwrap();
        rx
    }
}

/// Interpreter whose behaviour is fixed up front.
#[derive(Default)]
struct FakeInterpreter {
    output: Vec<&'static str>,
    fail_with: Option<&'static str>,
    ask: Option<&'static str>,
    bindings: Option<Bindings>,
    version: Option<&'static str>,
    executed: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Interpreter for FakeInterpreter {
    async fn install_input_hook(&mut self) -> Result<(), RuntimeError> {
        Ok(())
    }

    async fn execute(&mut self, code: &str, page: &mut dyn Page) -> Result<(), RuntimeError> {
        self.executed.lock().unwrap().push(code.to_string());
        if let Some(prompt) = self.ask {
            match page.request_input(prompt).await.unwrap_or(None) {
                Some(answer) => page.append_output(Some(&format!("{answer}\n"))),
                None => return Err(RuntimeError::Python("KeyboardInterrupt".into())),
            }
        }
        for line in &self.output {
            page.append_output(Some(&format!("{line}\n")));
        }
        match self.fail_with {
            Some(message) => Err(RuntimeError::Python(message.to_string())),
            None => Ok(()),
        }
    }

    async fn user_bindings(&mut self) -> Result<Bindings, RuntimeError> {
        self.bindings
            .clone()
            .ok_or_else(|| RuntimeError::Protocol("no bindings".into()))
    }

    fn version(&self) -> Option<&str> {
        self.version
    }
}

fn ready_controller(fake: FakeInterpreter) -> (ExecutionController<FakeInterpreter, RecordingPage>, RecordingPage) {
    let page = RecordingPage::default();
    let mut controller = ExecutionController::new(page.clone());
    controller.finish_load(Ok(fake));
    page.calls.lock().unwrap().clear();
    (controller, page)
}

#[tokio::test]
async fn run_before_ready_only_prints_notice() {
    let page = RecordingPage::default();
    let mut controller: ExecutionController<FakeInterpreter, _> = ExecutionController::new(page.clone());

    controller.run("print(1)").await;

    assert!(!controller.is_ready());
    assert_eq!(page.calls(), vec![Call::Output(NOT_READY_NOTICE.to_string())]);
}

#[tokio::test]
async fn successful_run_reports_output_status_and_variables() {
    let executed = Arc::new(Mutex::new(Vec::new()));
    let (mut controller, page) = ready_controller(FakeInterpreter {
        output: vec!["5"],
        bindings: Some(vec![("x".into(), "5".into())]),
        executed: executed.clone(),
        ..Default::default()
    });

    controller.run("x = 5\nprint(x)").await;

    assert_eq!(executed.lock().unwrap().as_slice(), ["x = 5\nprint(x)"]);
    assert_eq!(
        page.calls(),
        vec![
            Call::RunEnabled(false),
            Call::Status(RunStatus::Running),
            Call::Output("5\n".into()),
            Call::Status(RunStatus::Done),
            Call::Variables("x = 5".into()),
            Call::RunEnabled(true),
        ]
    );
}

#[tokio::test]
async fn failed_run_prints_error_and_reenables_run() {
    let (mut controller, page) = ready_controller(FakeInterpreter {
        output: vec!["before"],
        fail_with: Some("Traceback (most recent call last):\nNameError: name 'y' is not defined"),
        bindings: Some(Vec::new()),
        ..Default::default()
    });

    controller.run("print('before')\ny").await;

    let calls = page.calls();
    assert!(calls.contains(&Call::Output("before\n".into())));
    assert!(calls.iter().any(|c| matches!(c, Call::Output(t) if t.contains("NameError"))));
    assert!(calls.contains(&Call::Status(RunStatus::Error)));
    assert!(!calls.iter().any(|c| matches!(c, Call::Variables(_))));
    assert_eq!(calls.last(), Some(&Call::RunEnabled(true)));
}

#[tokio::test]
async fn variable_inspection_failure_is_swallowed() {
    let (mut controller, page) = ready_controller(FakeInterpreter::default());

    controller.run("pass").await;

    let calls = page.calls();
    assert!(calls.contains(&Call::Status(RunStatus::Done)));
    assert!(!calls.iter().any(|c| matches!(c, Call::Variables(_) | Call::Output(_))));
    assert_eq!(calls.last(), Some(&Call::RunEnabled(true)));
}

#[tokio::test]
async fn input_prompt_answer_and_dismissal() {
    let (mut controller, page) = ready_controller(FakeInterpreter {
        ask: Some("Name? "),
        bindings: Some(Vec::new()),
        ..Default::default()
    });

    // Answers are popped from the back.
    page.answers.lock().unwrap().extend([None, Some("Ada".to_string())]);

    controller.run("input('Name? ')").await;
    assert!(page.calls().contains(&Call::Output("Ada\n".into())));
    assert!(page.calls().contains(&Call::Status(RunStatus::Done)));

    page.calls.lock().unwrap().clear();
    controller.run("input('Name? ')").await;
    let calls = page.calls();
    assert!(calls.contains(&Call::Input("Name? ".into())));
    assert!(calls.contains(&Call::Output("KeyboardInterrupt".into())));
    assert!(calls.contains(&Call::Status(RunStatus::Error)));
}

#[tokio::test]
async fn successful_load_reports_version_then_ready() {
    let page = RecordingPage::default();
    let mut controller = ExecutionController::new(page.clone());

    controller.finish_load(Ok(FakeInterpreter {
        version: Some("3.12.1"),
        ..Default::default()
    }));

    assert!(controller.is_ready());
    assert_eq!(
        page.calls(),
        vec![Call::Version("3.12.1".into()), Call::Status(RunStatus::Ready)]
    );
}

#[tokio::test]
async fn load_failure_is_reported_and_runs_stay_blocked() {
    let page = RecordingPage::default();
    let mut controller: ExecutionController<FakeInterpreter, _> = ExecutionController::new(page.clone());

    controller.finish_load(Err(RuntimeError::Load("no python3 found".into())));
    controller.run("print(1)").await;

    assert_eq!(
        page.calls(),
        vec![
            Call::Output("failed to load Python runtime: no python3 found".into()),
            Call::Status(RunStatus::Error),
            Call::Output(NOT_READY_NOTICE.to_string()),
        ]
    );
}

#[tokio::test]
async fn worker_answers_runs_while_loading() {
    let page = RecordingPage::default();
    let controller: ExecutionController<FakeInterpreter, _> = ExecutionController::new(page.clone());
    let (tx, rx) = mpsc::unbounded_channel();

    tx.send(RuntimeRequest::Run { code: "print(1)".into() }).unwrap();
    drop(tx);
    let load = std::future::pending::<Result<FakeInterpreter, RuntimeError>>();
    let controller = serve(controller, load, rx).await;

    assert!(!controller.is_ready());
    assert_eq!(page.calls(), vec![Call::Output(NOT_READY_NOTICE.to_string())]);
}

#[tokio::test]
async fn worker_runs_after_load_completes() {
    let page = RecordingPage::default();
    let controller = ExecutionController::new(page.clone());
    let (tx, rx) = mpsc::unbounded_channel();
    let fake = FakeInterpreter {
        output: vec!["1"],
        bindings: Some(vec![("n".into(), "1".into())]),
        ..Default::default()
    };
    let worker = tokio::spawn(serve(controller, async { Ok::<_, RuntimeError>(fake) }, rx));

    tokio::time::timeout(Duration::from_secs(5), async {
        while !page.calls().contains(&Call::Status(RunStatus::Ready)) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    tx.send(RuntimeRequest::Run { code: "n = 1\nprint(n)".into() }).unwrap();
    tx.send(RuntimeRequest::RefreshVariables).unwrap();
    drop(tx);
    let controller = worker.await.unwrap();

    assert!(controller.is_ready());
    let calls = page.calls();
    assert!(calls.contains(&Call::Output("1\n".into())));
    let refreshes = calls
        .iter()
        .filter(|c| **c == Call::Variables("n = 1".into()))
        .count();
    assert_eq!(refreshes, 2);
}
