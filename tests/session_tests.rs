//! Session loop tests over a loopback agent socket.
//!
//! The test plays the agent: it listens, the session connects to it.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use buckshot_duel::core::{DuelError, SessionConfig, Side};
use buckshot_duel::duel::DuelBuilder;
use buckshot_duel::observation::Observation;
use buckshot_duel::policy::RandomPolicy;
use buckshot_duel::protocol::StepReply;
use buckshot_duel::session::{SessionError, SessionServer};

const WAIT: Duration = Duration::from_secs(5);

fn accept_within(listener: &TcpListener, limit: Duration) -> TcpStream {
    listener.set_nonblocking(true).unwrap();
    let deadline = Instant::now() + limit;
    loop {
        match listener.accept() {
            Ok((stream, _)) => {
                stream.set_nonblocking(false).unwrap();
                stream.set_read_timeout(Some(WAIT)).unwrap();
                return stream;
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                assert!(Instant::now() < deadline, "session never connected");
                thread::sleep(Duration::from_millis(5));
            }
            Err(e) => panic!("accept failed: {e}"),
        }
    }
}

struct Agent {
    writer: TcpStream,
    reader: BufReader<TcpStream>,
}

impl Agent {
    fn new(stream: TcpStream) -> Self {
        let reader = BufReader::new(stream.try_clone().unwrap());
        Self {
            writer: stream,
            reader,
        }
    }

    fn request(&mut self, message: &str) -> String {
        writeln!(self.writer, "{message}").unwrap();
        let mut line = String::new();
        self.reader.read_line(&mut line).unwrap();
        assert!(line.ends_with('\n'), "reply not line-terminated: {line:?}");
        line.trim_end().to_string()
    }
}

fn line_config(port: u16) -> SessionConfig {
    SessionConfig::default()
        .with_address("127.0.0.1", port)
        .with_agent_sides(vec![Side::B])
        .with_line_terminated(true)
        .with_tick_interval(Duration::from_millis(2))
        .with_reconnect_interval(Duration::from_millis(20))
}

// =============================================================================
// Agent link
// =============================================================================

#[test]
fn test_agent_and_human_share_the_duel() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let duel = DuelBuilder::new()
        .seed(5)
        .first_turn(Side::B)
        .auto_start(true)
        .build()
        .unwrap();
    let mut server = SessionServer::new(duel, line_config(port)).unwrap();
    let handle = server.handle();
    let session = thread::spawn(move || server.run());

    let mut agent = Agent::new(accept_within(&listener, WAIT));

    let state = Observation::parse_csv(&agent.request("get_state")).unwrap();
    assert_eq!(state.turn_flag, 0);
    assert_eq!(state.lives, [4, 4]);

    let step = StepReply::parse(&agent.request("play_step:1")).unwrap();
    assert!(!step.match_over);
    assert!(step.reward == 10.0 || step.reward == -5.0);
    assert_eq!(step.observation.turn_flag, 1);

    // Handle actions are turn-checked like agent ones.
    let refused = handle.execute_human(Side::B, 2);
    assert!(matches!(
        refused,
        Err(SessionError::Duel(DuelError::NotYourTurn { side: Side::B }))
    ));

    let (_, over) = handle.execute_human(Side::A, 2).unwrap();
    assert!(!over);

    let state = Observation::parse_csv(&agent.request("get_state")).unwrap();
    assert_eq!(state.turn_flag, 0);

    handle.stop().unwrap();
    session.join().unwrap().unwrap();
}

#[test]
fn test_reconnects_after_agent_drops() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let duel = DuelBuilder::new()
        .seed(6)
        .first_turn(Side::B)
        .auto_start(true)
        .build()
        .unwrap();
    let mut server = SessionServer::new(duel, line_config(port)).unwrap();
    let handle = server.handle();
    let session = thread::spawn(move || server.run());

    let mut first = Agent::new(accept_within(&listener, WAIT));
    let before = first.request("get_state");
    drop(first);

    let mut second = Agent::new(accept_within(&listener, WAIT));
    let after = second.request("get_state");
    assert_eq!(before, after);

    handle.stop().unwrap();
    session.join().unwrap().unwrap();
}

// =============================================================================
// Headless
// =============================================================================

#[test]
fn test_policy_only_session_stops_at_match_limit() {
    // Nothing listens here; the session keeps retrying in the background.
    let port = {
        let unused = TcpListener::bind("127.0.0.1:0").unwrap();
        unused.local_addr().unwrap().port()
    };
    let config = SessionConfig::default()
        .with_address("127.0.0.1", port)
        .with_agent_sides(Vec::new())
        .with_tick_interval(Duration::from_millis(0))
        .with_reconnect_interval(Duration::from_secs(60))
        .with_max_matches(2);
    let duel = DuelBuilder::new().seed(8).auto_start(true).build().unwrap();

    let mut server = SessionServer::new(duel, config)
        .unwrap()
        .with_opponent(Box::new(RandomPolicy));
    server.run().unwrap();

    assert_eq!(server.matches_completed(), 2);
    assert!(server.is_stopped());
    assert!(!server.is_connected());
}
