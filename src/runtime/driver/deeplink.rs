use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;
use crate::identifier::{SCREEN_FIELD, ScreenIdentifier};
use crate::logging::{DRIVER_TARGET, LogLevel, event_with_fields, json_kv, json_str};
use crate::navigation::NavigationOperation;
use crate::presentation::HierarchySnapshot;
use crate::router::AppRouter;

use super::{DriverError, DriverResult};

const NAVIGATION_FIELD: &str = "navigation";
const SECTION_FIELD: &str = "section";

/// Operation names accepted in the `navigation` field of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeepLinkNavigation {
    #[default]
    Root,
    Push,
    Present,
    Pop,
    Dismiss,
    PopToRoot,
}

impl DeepLinkNavigation {
    pub fn operation(self) -> NavigationOperation {
        match self {
            Self::Root => NavigationOperation::root(),
            Self::Push => NavigationOperation::push(),
            Self::Present => NavigationOperation::present(),
            Self::Pop => NavigationOperation::pop(),
            Self::Dismiss => NavigationOperation::dismiss(),
            Self::PopToRoot => NavigationOperation::pop_to_root(),
        }
    }

    pub fn is_close(self) -> bool {
        matches!(self, Self::Pop | Self::Dismiss | Self::PopToRoot)
    }
}

/// One outbound line per inbound frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    pub changed: bool,
    pub fingerprint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Feeds line-delimited JSON deep links into an `AppRouter`.
///
/// A bad frame is answered with an error acknowledgement and the driver
/// moves on to the next line; only transport failures end a session.
pub struct DeepLinkDriver {
    router: Rc<AppRouter>,
    listener: Option<TcpListener>,
}

impl DeepLinkDriver {
    pub fn new(router: Rc<AppRouter>) -> Self {
        Self {
            router,
            listener: None,
        }
    }

    pub fn bind<A>(addr: A, router: Rc<AppRouter>) -> DriverResult<Self>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr)?;
        Ok(Self {
            router,
            listener: Some(listener),
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener
            .as_ref()
            .and_then(|listener| listener.local_addr().ok())
    }

    /// Serve a single TCP client until it disconnects.
    pub fn run(&self) -> DriverResult<usize> {
        let listener = self.listener.as_ref().ok_or(DriverError::NotBound)?;
        let (stream, peer) = listener.accept()?;
        stream.set_nodelay(true).ok();
        self.log(
            LogLevel::Info,
            "client_connected",
            [json_str("peer", peer.to_string())],
        );
        let inbound = BufReader::new(stream.try_clone()?);
        let mut outbound = stream;
        let handled = self.serve_lines(inbound, &mut outbound)?;
        self.log(
            LogLevel::Info,
            "client_disconnected",
            [json_kv("frames", handled)],
        );
        Ok(handled)
    }

    /// Answer every non-blank line of `reader` on `writer`. Returns the number
    /// of frames handled.
    pub fn serve_lines<R, W>(&self, reader: R, writer: &mut W) -> DriverResult<usize>
    where
        R: BufRead,
        W: Write,
    {
        let mut handled = 0;
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let ack = self.handle_frame(&line);
            let encoded = serde_json::to_string(&ack)?;
            writer.write_all(encoded.as_bytes())?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Apply one frame and describe the outcome.
    pub fn handle_frame(&self, line: &str) -> Acknowledgement {
        let before = self.fingerprint();
        let outcome = self.apply_frame(line);
        let after = self.fingerprint();
        let changed = before != after;

        match outcome {
            Ok(screen) => {
                self.log(
                    LogLevel::Debug,
                    "frame_applied",
                    [
                        json_kv("screen", screen.clone()),
                        json_kv("changed", changed),
                    ],
                );
                Acknowledgement {
                    ok: true,
                    screen,
                    changed,
                    fingerprint: after,
                    error: None,
                }
            }
            Err(err) => {
                if let Some(metrics) = self.router.config().metrics_handle() {
                    metrics.borrow_mut().record_decode_failure();
                }
                self.log(
                    LogLevel::Warn,
                    "frame_rejected",
                    [json_str("error", err.to_string())],
                );
                Acknowledgement {
                    ok: false,
                    screen: None,
                    changed,
                    fingerprint: after,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    fn apply_frame(&self, line: &str) -> Result<Option<String>, DecodeError> {
        let frame: Value = serde_json::from_str(line)?;
        let object = frame.as_object().ok_or(DecodeError::NotAnObject)?;

        let navigation = match object.get(NAVIGATION_FIELD) {
            None | Some(Value::Null) => None,
            Some(raw) => Some(
                DeepLinkNavigation::deserialize(raw).map_err(|_| DecodeError::InvalidField {
                    field: NAVIGATION_FIELD,
                })?,
            ),
        };
        let section = match object.get(SECTION_FIELD) {
            None | Some(Value::Null) => None,
            Some(raw) => Some(raw.as_u64().ok_or(DecodeError::InvalidField {
                field: SECTION_FIELD,
            })?),
        };

        let identifier = if object.contains_key(SCREEN_FIELD) {
            Some(ScreenIdentifier::decode(&frame)?)
        } else {
            match navigation {
                Some(navigation) if navigation.is_close() => None,
                None if section.is_some() => None,
                _ => {
                    return Err(DecodeError::MissingField {
                        field: SCREEN_FIELD,
                    });
                }
            }
        };

        if let Some(index) = section {
            self.router
                .open(usize::try_from(index).unwrap_or(usize::MAX));
        }

        let Some(identifier) = identifier else {
            if let Some(navigation) = navigation {
                self.router.route(None, None, navigation.operation());
            }
            return Ok(None);
        };
        let operation = navigation.unwrap_or_default().operation();
        self.router.route(Some(&identifier), None, operation);
        Ok(Some(identifier.tag().to_string()))
    }

    fn fingerprint(&self) -> String {
        HierarchySnapshot::capture(self.router.sections()).fingerprint_hex()
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.router.config().logger.as_ref() {
            let _ = logger.log_event(event_with_fields(level, DRIVER_TARGET, message, fields));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::Section;
    use crate::runtime::RouterConfig;
    use crate::runtime::bootstrap::bootstrap;
    use std::io::{Cursor, Read};
    use std::net::TcpStream;
    use std::thread;

    fn acks(output: &[u8]) -> Vec<Acknowledgement> {
        String::from_utf8_lossy(output)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn frames_drive_the_router() {
        let mut config = RouterConfig::default();
        config.enable_metrics();
        let app = bootstrap(config);
        let driver = DeepLinkDriver::new(Rc::clone(&app.router));
        let input = concat!(
            "{\"screen\":\"Settings\",\"navigation\":\"push\"}\n",
            "\n",
            "{\"navigation\":\"pop\"}\n",
            "{\"screen\":\"bogus\"}\n",
            "not json\n",
            "{\"section\":2}\n",
            "{\"screen\":\"detail\",\"dependency\":{\"itemID\":7,\"itemName\":\"Linked\"},\"navigation\":\"push\",\"section\":1}\n",
        );
        let mut output = Vec::new();
        let handled = driver
            .serve_lines(Cursor::new(input), &mut output)
            .unwrap();
        assert_eq!(handled, 6);

        let acks = acks(&output);
        assert!(acks[0].ok && acks[0].changed);
        assert_eq!(acks[0].screen.as_deref(), Some("settings"));
        assert!(acks[1].ok && acks[1].changed);
        assert!(!acks[2].ok);
        assert!(acks[2].error.as_deref().unwrap().contains("screen"));
        assert!(!acks[2].changed);
        assert!(!acks[3].ok);
        assert!(acks[4].ok && acks[4].changed);
        assert_eq!(app.router.selected_section(), Some(Section::Settings));
        assert!(acks[5].ok);
        assert_eq!(app.titles(Section::Detail), vec!["Initialization", "Linked"]);
        assert_eq!(app.titles(Section::Home), vec!["Home"]);
        assert_eq!(app.router.metrics().unwrap().decode_failures, 2);
    }

    #[test]
    fn open_navigation_without_screen_is_rejected() {
        let app = bootstrap(RouterConfig::default());
        let driver = DeepLinkDriver::new(Rc::clone(&app.router));
        let ack = driver.handle_frame("{\"navigation\":\"push\"}");
        assert!(!ack.ok);
        let ack = driver.handle_frame("{\"screen\":\"home\",\"navigation\":\"sideways\"}");
        assert!(!ack.ok);
        assert!(ack.error.unwrap().contains("navigation"));
    }

    #[test]
    fn rejected_frame_leaves_the_section_alone() {
        let mut config = RouterConfig::default();
        config.enable_metrics();
        let app = bootstrap(config);
        let driver = DeepLinkDriver::new(Rc::clone(&app.router));
        let before = app.router.selected_section();
        let changes = app.router.metrics().unwrap().section_changes;

        let ack = driver.handle_frame("{\"section\":2,\"screen\":\"bogus\"}");
        assert!(!ack.ok);
        assert!(!ack.changed);
        let ack = driver.handle_frame("{\"section\":2,\"navigation\":\"present\"}");
        assert!(!ack.ok);
        assert!(!ack.changed);
        assert_eq!(app.router.selected_section(), before);
        assert_eq!(app.router.metrics().unwrap().section_changes, changes);
    }

    #[test]
    fn run_serves_one_tcp_client() {
        let app = bootstrap(RouterConfig::default());
        let driver = DeepLinkDriver::bind("127.0.0.1:0", Rc::clone(&app.router)).unwrap();
        let addr = driver.local_addr().unwrap();

        let client = thread::spawn(move || {
            let mut stream = TcpStream::connect(addr).unwrap();
            stream
                .write_all(b"{\"screen\":\"settings\",\"navigation\":\"root\"}\n")
                .unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
            let mut reply = String::new();
            stream.read_to_string(&mut reply).unwrap();
            reply
        });

        assert_eq!(driver.run().unwrap(), 1);
        let reply = client.join().unwrap();
        let ack: Acknowledgement = serde_json::from_str(reply.trim()).unwrap();
        assert!(ack.ok && ack.changed);
        assert_eq!(app.router.selected_section(), Some(Section::Settings));
    }

    #[test]
    fn run_without_listener_fails() {
        let app = bootstrap(RouterConfig::default());
        let driver = DeepLinkDriver::new(Rc::clone(&app.router));
        assert!(matches!(driver.run(), Err(DriverError::NotBound)));
    }
}
