use rate_prompt::{
    ClientConfig, Error, JsonFileStore, ModalSlot, Presentation, PromptOutcome,
    PromptRenderer, PromptRequest, Result, StoreReviewFlow, TextRef,
};
use url::Url;

/// Prints the prompt to the terminal.
struct TerminalRenderer {
    slot: ModalSlot,
}

impl PromptRenderer for TerminalRenderer {
    fn present(&mut self, request: &PromptRequest) -> Result<Presentation> {
        if !self.slot.open() {
            return Ok(Presentation::AlreadyVisible);
        }
        println!("== {} ==", text(request.title));
        println!("{}", text(request.message));
        println!(
            "[{}] [{}] [{}]",
            text(request.yes_button),
            text(request.no_button),
            text(request.cancel_button)
        );
        Ok(Presentation::Shown)
    }
}

fn text(text: TextRef) -> String {
    match text {
        TextRef::Builtin(label) => label.default_text().to_owned(),
        TextRef::Resource(id) => format!("<resource {}>", id.0),
    }
}

/// No review SDK on a desktop.
struct NoReviewSdk;

impl StoreReviewFlow for NoReviewSdk {
    fn launch_review(&mut self) -> Result<()> {
        Err(Error::ReviewUnavailable)
    }
}

pub fn main() {
    env_logger::init();

    // Answer to give if the prompt shows up: "yes", "no" or anything else for "later".
    let answer = std::env::args().nth(1).unwrap_or_default();

    let store = JsonFileStore::open_in(std::env::temp_dir().join("rate-prompt-demo")).unwrap();
    let mut client = ClientConfig::new("com.example.app")
        .criteria(7, 3)
        .launch_target(|url: &Url| -> Result<()> {
            println!("opening {}", url);
            Ok(())
        })
        .callback(|outcome: PromptOutcome| println!("callback: {:?}", outcome))
        .store(store)
        .to_client();

    client.notify_launch();
    println!("launch count: {}", client.launch_count());

    let mut renderer = TerminalRenderer {
        slot: ModalSlot::new(),
    };
    if client.show_prompt_if_needed(&mut NoReviewSdk, &mut renderer, None) {
        let outcome = match answer.as_str() {
            "yes" => PromptOutcome::Accepted,
            "no" => PromptOutcome::Declined,
            _ => PromptOutcome::Deferred,
        };
        client.handle_outcome(outcome);
        renderer.slot.close();
    } else {
        println!("not asking yet");
    }
}
