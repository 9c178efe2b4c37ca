//! Text wire format between the simulation and the external agent.
//!
//! ```text
//! -> get_state
//! <- 0,5,3,2,4,4,1,0,2,0,1,0,1,0,0,2,1,2,0,0
//! -> play_step:1
//! <- 0,4,2,2,4,3,1,0,2,0,1,0,1,0,0,2,1,2,0,0:10:False
//! -> reset
//! ```
//!
//! Messages are colon-delimited with no terminator. A read may carry
//! several newline-separated messages; `MessageFramer` splits them.

use thiserror::Error;

use crate::observation::Observation;

/// Errors parsing an agent message.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty message")]
    Empty,
    #[error("unknown verb: {0:?}")]
    UnknownVerb(String),
    #[error("play_step without an action index")]
    MissingArgument,
    #[error("bad action index: {0:?}")]
    BadIndex(String),
}

/// A parsed agent request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// Send back the state vector.
    GetState,
    /// Execute the action with this zero-based index.
    PlayStep(usize),
    /// Start a fresh match (only once the current one is over).
    Reset,
}

impl Request {
    pub const GET_STATE: &'static str = "get_state";
    pub const PLAY_STEP: &'static str = "play_step";
    pub const RESET: &'static str = "reset";

    /// Parse one message.
    pub fn parse(message: &str) -> Result<Self, ProtocolError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ProtocolError::Empty);
        }

        let (verb, arg) = match message.split_once(':') {
            Some((verb, arg)) => (verb.trim(), Some(arg.trim())),
            None => (message, None),
        };

        match verb {
            Self::GET_STATE => Ok(Request::GetState),
            Self::RESET => Ok(Request::Reset),
            Self::PLAY_STEP => {
                let arg = arg
                    .filter(|a| !a.is_empty())
                    .ok_or(ProtocolError::MissingArgument)?;
                arg.parse()
                    .map(Request::PlayStep)
                    .map_err(|_| ProtocolError::BadIndex(arg.to_string()))
            }
            other => Err(ProtocolError::UnknownVerb(other.to_string())),
        }
    }

    /// Wire form of the request.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Request::GetState => Self::GET_STATE.to_string(),
            Request::PlayStep(index) => format!("{}:{index}", Self::PLAY_STEP),
            Request::Reset => Self::RESET.to_string(),
        }
    }
}

impl std::str::FromStr for Request {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Request::parse(s)
    }
}

/// `True`/`False`, the boolean tokens the agent expects.
#[must_use]
pub fn bool_token(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// `<state-csv>:<reward>:<matchOver>`
#[must_use]
pub fn format_step(observation: &Observation, reward: f32, match_over: bool) -> String {
    format!("{}:{}:{}", observation.to_csv(), reward, bool_token(match_over))
}

/// Parsed `play_step` reply, for agent-side consumers.
#[derive(Clone, Debug, PartialEq)]
pub struct StepReply {
    pub observation: Observation,
    pub reward: f32,
    pub match_over: bool,
}

impl StepReply {
    /// Parse `<state-csv>:<reward>:<matchOver>`. Returns `None` on any malformed part.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.trim().splitn(3, ':');
        let observation = Observation::parse_csv(parts.next()?).ok()?;
        let reward = parts.next()?.trim().parse().ok()?;
        let match_over = match parts.next()?.trim() {
            t if t.eq_ignore_ascii_case("true") => true,
            f if f.eq_ignore_ascii_case("false") => false,
            _ => return None,
        };
        Some(Self {
            observation,
            reward,
            match_over,
        })
    }
}

/// Splits raw socket reads into messages.
///
/// In chunk mode every read is one message, with any newlines treated as
/// separators. In line mode a trailing partial line is held until its
/// newline arrives.
///
/// Chunk mode can't split unterminated messages that TCP coalesced into one
/// read: `get_stateplay_step:1` parses as a single unknown verb and is
/// dropped. Agents that may pipeline requests should send `\n` after each
/// one and run the session with `line_terminated`.
#[derive(Clone, Debug, Default)]
pub struct MessageFramer {
    line_terminated: bool,
    partial: String,
}

impl MessageFramer {
    #[must_use]
    pub fn new(line_terminated: bool) -> Self {
        Self {
            line_terminated,
            partial: String::new(),
        }
    }

    /// Feed one read; returns the complete, non-blank messages it finished.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.partial.push_str(chunk);
        let buffered = std::mem::take(&mut self.partial);

        let mut pieces: Vec<&str> = buffered.split('\n').collect();
        if self.line_terminated {
            if let Some(rest) = pieces.pop() {
                self.partial = rest.to_string();
            }
        }

        pieces
            .into_iter()
            .map(|p| p.trim_end_matches('\r').trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Drop any buffered partial line (on reconnect).
    pub fn clear(&mut self) {
        self.partial.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verbs() {
        assert_eq!(Request::parse("get_state"), Ok(Request::GetState));
        assert_eq!(Request::parse(" reset\n"), Ok(Request::Reset));
        assert_eq!(Request::parse("play_step:3"), Ok(Request::PlayStep(3)));
        assert_eq!("play_step: 0".parse::<Request>(), Ok(Request::PlayStep(0)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Request::parse(""), Err(ProtocolError::Empty));
        assert_eq!(Request::parse("play_step"), Err(ProtocolError::MissingArgument));
        assert_eq!(Request::parse("play_step:"), Err(ProtocolError::MissingArgument));
        assert_eq!(
            Request::parse("play_step:-1"),
            Err(ProtocolError::BadIndex("-1".to_string()))
        );
        assert_eq!(
            Request::parse("hello"),
            Err(ProtocolError::UnknownVerb("hello".to_string()))
        );
    }

    #[test]
    fn test_encode() {
        assert_eq!(Request::PlayStep(4).encode(), "play_step:4");
        assert_eq!(Request::parse(&Request::GetState.encode()), Ok(Request::GetState));
    }

    #[test]
    fn test_bool_token() {
        assert_eq!(bool_token(true), "True");
        assert_eq!(bool_token(false), "False");
    }

    #[test]
    fn test_chunk_framing() {
        let mut framer = MessageFramer::new(false);
        assert_eq!(framer.push("get_state"), vec!["get_state"]);
        assert_eq!(
            framer.push("play_step:1\nget_state\n"),
            vec!["play_step:1", "get_state"]
        );
        assert!(framer.push("\n").is_empty());
    }

    #[test]
    fn test_coalesced_reads_need_terminators() {
        let mut chunked = MessageFramer::new(false);
        let merged = chunked.push("get_stateplay_step:1");
        assert_eq!(merged, vec!["get_stateplay_step:1"]);
        assert!(matches!(
            Request::parse(&merged[0]),
            Err(ProtocolError::UnknownVerb(_))
        ));

        let mut lines = MessageFramer::new(true);
        assert_eq!(
            lines.push("get_state\nplay_step:1\n"),
            vec!["get_state", "play_step:1"]
        );
    }

    #[test]
    fn test_line_framing() {
        let mut framer = MessageFramer::new(true);
        assert!(framer.push("play_st").is_empty());
        assert_eq!(framer.push("ep:2\nres"), vec!["play_step:2"]);
        assert_eq!(framer.push("et\r\n"), vec!["reset"]);
        framer.push("partial");
        framer.clear();
        assert_eq!(framer.push("get_state\n"), vec!["get_state"]);
    }

    #[test]
    fn test_step_reply_parse() {
        let line = "1,2,1,1,4,3,0,0,0,0,0,0,0,0,0,0,1,2,0,0:-5:False";
        let reply = StepReply::parse(line).unwrap();
        assert_eq!(reply.reward, -5.0);
        assert!(!reply.match_over);
        assert_eq!(reply.observation.lives, [4, 3]);

        assert!(StepReply::parse("1,2:-5:False").is_none());
        assert!(StepReply::parse(&format!("{}:x:True", line.split(':').next().unwrap())).is_none());
    }
}
