use assert_cmd::Command;
use assert_cmd::assert::Assert;
use assert_fs::TempDir;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

pub const SAMPLE_RESULT: &str = r#"{
  "text": "The acting was amazing but the story was boring",
  "sentiment": {
    "label": "Positive",
    "confidence": 0.62,
    "scores": {"positive": 0.412, "negative": 0.178, "neutral": 0.41}
  },
  "topics": ["Acting", "Story"],
  "aspects": {"acting": "Positive", "story": "Negative", "music": "Neutral", "direction": "Neutral"},
  "emotion": {
    "label": "Happy",
    "confidence": 0.71,
    "scores": {"happy": 0.55, "sad": 0.15, "angry": 0.1, "neutral": 0.2}
  },
  "text_analysis": {
    "length": 47,
    "word_count": 9,
    "sentence_count": 1,
    "tone": "Casual",
    "formality": "Informal",
    "sentiment_strength": "Moderate",
    "complexity": "Simple"
  },
  "keywords": ["acting", "amazing", "story", "boring"]
}"#;

pub const REVIEWS_CSV: &str = "text\n\
The acting was amazing but the story was boring\n\
Great soundtrack and beautiful cinematography\n\
The director lost the plot halfway through\n";

pub struct TextlensTestHelper<'a> {
    pub work_dir: TempDir,
    name: &'a str,
    counter: AtomicUsize,
}

impl<'a> TextlensTestHelper<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            work_dir: TempDir::new().unwrap(),
            name,
            counter: AtomicUsize::new(0),
        }
    }

    pub fn run_command(&self, args: &[&str]) -> Assert {
        let mut cmd = Command::cargo_bin("textlens").unwrap();
        cmd.current_dir(self.work_dir.path())
            .env(
                "TEXTLENS_RUN_ID",
                format!(
                    "{}-{}",
                    self.name,
                    self.counter.fetch_add(1, Ordering::Relaxed)
                ),
            )
            .env("TEXTLENS_OUTPUT_PROGRESS", "plain")
            .env("NO_COLOR", "1")
            .env_remove("TEXTLENS_API_URL")
            .env_remove("TEXTLENS_CONFIG_FILE")
            .args(args)
            .assert()
    }

    /// Runs a command against the service at `api_url`.
    pub fn run_against(&self, api_url: &str, args: &[&str]) -> Assert {
        let mut full_args = vec!["--api-url", api_url];
        full_args.extend_from_slice(args);
        self.run_command(&full_args)
    }
}

/// A fake classification service that accepts one connection, records the
/// raw request and either answers it or holds it open.
pub struct StubService {
    pub address: String,
    handle: JoinHandle<String>,
}

impl StubService {
    pub fn respond(status: u16, content_type: &str, body: &[u8]) -> Self {
        let mut response = format!(
            "HTTP/1.1 {} Stub\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
            status,
            content_type,
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(body);
        Self::start(Some(response))
    }

    pub fn json(status: u16, body: &str) -> Self {
        Self::respond(status, "application/json", body.as_bytes())
    }

    pub fn csv(body: &str) -> Self {
        Self::respond(200, "text/csv", body.as_bytes())
    }

    /// Reads the request and never answers it.
    pub fn stalled() -> Self {
        Self::start(None)
    }

    fn start(response: Option<Vec<u8>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());

        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            match response {
                Some(response) => {
                    stream.write_all(&response).unwrap();
                    stream.flush().unwrap();
                }
                None => std::thread::sleep(Duration::from_secs(3)),
            }
            request
        });

        Self { address, handle }
    }

    /// The raw request the service received, headers and body.
    pub fn request(self) -> String {
        self.handle.join().unwrap()
    }
}

/// An address nothing is listening on.
pub fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    address
}

fn read_request(stream: &mut impl Read) -> String {
    let mut data = Vec::new();
    let mut buffer = [0u8; 8192];

    loop {
        let read = stream.read(&mut buffer).unwrap_or(0);
        if read == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..read]);
        if is_complete(&data) {
            break;
        }
    }

    String::from_utf8_lossy(&data).to_string()
}

fn is_complete(data: &[u8]) -> bool {
    let text = String::from_utf8_lossy(data);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let headers = text[..header_end].to_lowercase();
    let body_len = data.len() - (header_end + 4);

    if headers.contains("transfer-encoding: chunked") {
        return text.ends_with("0\r\n\r\n");
    }

    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    body_len >= content_length
}
