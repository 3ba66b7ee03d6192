use crate::morse::decode_letter;
use crate::signal::{Callsign, Signal};

/// Displayable form of one participant's buffer: the raw marks and the
/// decoded text, kept separate so sinks can lay them out as they like.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Bubble {
    pub(crate) marks: String,
    pub(crate) text: String,
}

/// One finalized transmission in the room's session history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct HistoryEntry {
    pub(crate) callsign: Callsign,
    pub(crate) bubble: Bubble,
}

/// Serialize a signal sequence deterministically.
///
/// Marks accumulate into a letter run; each pause decodes the run and resets
/// it, and the trailing run is always decoded too, so a buffer that ends
/// mid-letter still shows a live decode attempt. Empty runs render nothing.
pub(crate) fn render(signals: &[Signal]) -> Bubble {
    let mut marks = String::new();
    let mut text = String::new();
    let mut run = String::new();

    for signal in signals {
        match signal {
            Signal::Dit | Signal::Dah => {
                if let Some(c) = signal.mark() {
                    marks.push(c);
                    run.push(c);
                }
            }
            Signal::LetterPause => {
                marks.push(' ');
                flush_run(&mut run, &mut text);
            }
            Signal::WordPause => {
                marks.push_str(" / ");
                flush_run(&mut run, &mut text);
                text.push(' ');
            }
        }
    }
    flush_run(&mut run, &mut text);

    Bubble { marks, text }
}

fn flush_run(run: &mut String, text: &mut String) {
    if run.is_empty() {
        return;
    }
    text.push_str(&decode_letter(run).to_string());
    run.clear();
}
