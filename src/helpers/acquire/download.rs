//! Artifact downloads
//!
//! Fetches one URL into the output directory with skip-if-present,
//! bounded retries and post-download hashing:
//!
//! - an existing destination is never re-downloaded or re-verified;
//! - the body streams into a temporary file next to the destination and is
//!   renamed into place only once complete, so a failed attempt leaves nothing;
//! - a 404 stops immediately, other failures retry per [`RetryPolicy`].

use crate::core::error::FetchError;
use crate::core::output;
use crate::core::stats::DownloadOutcome;
use crate::helpers::http::HttpClient;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::retry::{AttemptResult, AttemptState, RetryPolicy};
use crate::helpers::internal::fs_utils;
use crate::helpers::internal::hash;
use crate::helpers::internal::progress::DownloadProgress;

/// Read/write chunk size (8 KiB)
const CHUNK_SIZE: usize = 8 * 1024;

/// What to fetch and where to put it.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    /// Destination filename inside the output directory
    pub filename: String,
    /// Human label for log lines, e.g. "Docker Compose (x86_64)"
    pub description: String,
    /// Mark the file executable after a successful transfer
    pub executable: bool,
}

pub struct Downloader<'a> {
    client: &'a HttpClient,
    output_dir: &'a Path,
    policy: RetryPolicy,
}

impl<'a> Downloader<'a> {
    pub fn new(client: &'a HttpClient, output_dir: &'a Path, policy: RetryPolicy) -> Self {
        Self {
            client,
            output_dir,
            policy,
        }
    }

    pub fn destination(&self, filename: &str) -> PathBuf {
        self.output_dir.join(filename)
    }

    /// Acquire `request.url` as `request.filename`.
    pub fn fetch(&self, request: &DownloadRequest) -> DownloadOutcome {
        let dest = self.destination(&request.filename);

        if dest.exists() {
            output::skip(&format!("{} already present, skipping", request.filename));
            return DownloadOutcome::Skipped;
        }

        let mut state = AttemptState::Attempting(1);
        loop {
            match state {
                AttemptState::Attempting(n) => {
                    if n == 1 {
                        output::sub_action(&format!("downloading {}", request.description));
                    } else {
                        output::sub_action(&format!(
                            "retrying {} ({}/{})",
                            request.description, n, self.policy.max_attempts
                        ));
                    }
                    output::detail(&request.url);

                    let result = match self.transfer(&request.url, &dest) {
                        Ok(_) => AttemptResult::Success,
                        Err(e) => {
                            output::error(&format!("{}: {}", request.description, e));
                            if e.is_not_found() {
                                AttemptResult::NotFound
                            } else {
                                AttemptResult::Transient
                            }
                        }
                    };
                    state = self.policy.next(n, result);
                }
                AttemptState::Retrying { next, delay } => {
                    output::info(&format!("waiting {}s before retrying", delay.as_secs_f32()));
                    std::thread::sleep(delay);
                    state = AttemptState::Attempting(next);
                }
                AttemptState::Succeeded => return self.finish(request, &dest),
                AttemptState::Aborted | AttemptState::Exhausted => {
                    output::error(&format!("{} download failed", request.description));
                    return DownloadOutcome::Failed;
                }
            }
        }
    }

    /// Post-download bookkeeping: mode, hash, size.
    fn finish(&self, request: &DownloadRequest, dest: &Path) -> DownloadOutcome {
        if request.executable
            && let Err(e) = fs_utils::set_mode(dest, 0o755)
        {
            output::warning(&format!("chmod failed for {}: {}", dest.display(), e));
        }

        let bytes = match std::fs::metadata(dest) {
            Ok(m) => m.len(),
            Err(e) => {
                output::error(&format!("cannot stat {}: {}", dest.display(), e));
                return DownloadOutcome::Failed;
            }
        };

        output::success(&format!("{} downloaded", request.description));
        output::detail(&format!("path: {}", dest.display()));
        output::detail(&format!("size: {:.2} MB", bytes as f64 / (1024.0 * 1024.0)));
        match hash::sha256_file(dest) {
            Ok(digest) => output::detail(&format!("sha256: {}", digest)),
            Err(e) => output::warning(&format!("cannot hash {}: {}", dest.display(), e)),
        }

        DownloadOutcome::Succeeded { bytes }
    }

    /// One streaming transfer. Returns bytes written.
    fn transfer(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let response = self.client.get_stream(url)?;

        let total = response
            .header("content-length")
            .and_then(|s| s.parse::<u64>().ok());
        let label = fs_utils::file_name(dest).unwrap_or("download");
        let mut progress = DownloadProgress::start(&format!("downloading {}", label), total);

        // Dropped (and deleted) on any early return.
        let mut part = tempfile::Builder::new()
            .prefix(".download-")
            .suffix(".part")
            .tempfile_in(self.output_dir)?;

        let mut reader = response.into_reader();
        let mut buffer = [0u8; CHUNK_SIZE];
        let mut written = 0u64;

        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            part.write_all(&buffer[..n])?;
            written += n as u64;
            progress.update(written);
        }
        progress.finish();

        part.as_file().sync_all()?;
        part.persist(dest).map_err(|e| FetchError::Io(e.error))?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{HttpSettings, Timeouts};
    use std::net::TcpListener;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(server: &MockServer, route: &str, filename: &str) -> DownloadRequest {
        DownloadRequest {
            url: format!("{}{}", server.uri(), route),
            filename: filename.to_string(),
            description: filename.to_string(),
            executable: false,
        }
    }

    fn no_wait(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }

    /// Files other than the expected ones left in the directory.
    fn leftovers(dir: &Path, expected: &[&str]) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|n| !expected.contains(&n.as_str()))
            .collect()
    }

    /// Serve one response of `chunks` pieces, sleeping `gap` before each.
    fn trickle_server(chunks: usize, piece: &'static [u8], gap: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request);
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                chunks * piece.len()
            );
            let _ = stream.write_all(head.as_bytes());
            for _ in 0..chunks {
                std::thread::sleep(gap);
                if stream.write_all(piece).and_then(|_| stream.flush()).is_err() {
                    return;
                }
            }
        });
        format!("http://{}/docker-27.4.1.tgz", addr)
    }

    fn client_with_download_timeout(timeout: Duration) -> HttpClient {
        HttpClient::new(HttpSettings {
            timeouts: Timeouts {
                download: timeout,
                ..Default::default()
            },
            ..Default::default()
        })
    }

    fn trickle_request(url: String) -> DownloadRequest {
        DownloadRequest {
            url,
            filename: "docker-27.4.1-x86_64.tgz".to_string(),
            description: "Docker binaries (x86_64)".to_string(),
            executable: false,
        }
    }

    #[test]
    fn test_slow_transfer_outlasting_timeout_completes() {
        // 8 x 300ms = 2.4s in total, each gap well under the 1s timeout.
        let url = trickle_server(8, b"abcde", Duration::from_millis(300));
        let dir = tempfile::tempdir().unwrap();
        let client = client_with_download_timeout(Duration::from_secs(1));
        let downloader = Downloader::new(&client, dir.path(), no_wait(1));

        let req = trickle_request(url);
        let outcome = downloader.fetch(&req);

        assert_eq!(outcome, DownloadOutcome::Succeeded { bytes: 40 });
        assert_eq!(
            std::fs::read(dir.path().join(&req.filename)).unwrap(),
            b"abcde".repeat(8)
        );
    }

    #[test]
    fn test_stalled_transfer_fails() {
        let url = trickle_server(2, b"abcde", Duration::from_millis(1500));
        let dir = tempfile::tempdir().unwrap();
        let client = client_with_download_timeout(Duration::from_millis(300));
        let downloader = Downloader::new(&client, dir.path(), no_wait(1));

        let req = trickle_request(url);
        assert_eq!(downloader.fetch(&req), DownloadOutcome::Failed);
        assert!(!dir.path().join(&req.filename).exists());
        assert!(leftovers(dir.path(), &[]).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_writes_file_and_reports_size() {
        let mock_server = MockServer::start().await;
        let body = vec![42u8; 3 * CHUNK_SIZE + 5];

        Mock::given(method("GET"))
            .and(path("/x86_64/docker-27.4.1.tgz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = HttpClient::default();
        let downloader = Downloader::new(&client, dir.path(), no_wait(3));

        let req = request(&mock_server, "/x86_64/docker-27.4.1.tgz", "docker-27.4.1-x86_64.tgz");
        let outcome = downloader.fetch(&req);

        assert_eq!(
            outcome,
            DownloadOutcome::Succeeded {
                bytes: body.len() as u64
            }
        );
        assert_eq!(std::fs::read(dir.path().join(&req.filename)).unwrap(), body);
        assert!(leftovers(dir.path(), &["docker-27.4.1-x86_64.tgz"]).is_empty());
    }

    #[tokio::test]
    async fn test_second_fetch_is_skipped_without_transfer() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/file"))
            .respond_with(ResponseTemplate::new(200).set_body_string("payload"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = HttpClient::default();
        let downloader = Downloader::new(&client, dir.path(), no_wait(3));
        let req = request(&mock_server, "/file", "artifact");

        assert!(matches!(downloader.fetch(&req), DownloadOutcome::Succeeded { .. }));
        assert_eq!(downloader.fetch(&req), DownloadOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_transient_failure_retries_max_attempts() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = HttpClient::default();
        let downloader = Downloader::new(&client, dir.path(), no_wait(3));
        let req = request(&mock_server, "/flaky", "flaky.tgz");

        assert_eq!(downloader.fetch(&req), DownloadOutcome::Failed);
        assert!(leftovers(dir.path(), &[]).is_empty());
    }

    #[tokio::test]
    async fn test_404_stops_retrying() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = HttpClient::default();
        let downloader = Downloader::new(&client, dir.path(), no_wait(5));
        let req = request(&mock_server, "/missing", "missing.tgz");

        assert_eq!(downloader.fetch(&req), DownloadOutcome::Failed);
        assert!(!dir.path().join("missing.tgz").exists());
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/recover"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(1)
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/recover"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = HttpClient::default();
        let downloader = Downloader::new(&client, dir.path(), no_wait(3));
        let req = request(&mock_server, "/recover", "recover.tgz");

        assert_eq!(downloader.fetch(&req), DownloadOutcome::Succeeded { bytes: 2 });
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_executable_flag_sets_mode() {
        use std::os::unix::fs::PermissionsExt;

        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/compose"))
            .respond_with(ResponseTemplate::new(200).set_body_string("#!/bin/true"))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = HttpClient::default();
        let downloader = Downloader::new(&client, dir.path(), no_wait(1));
        let mut req = request(&mock_server, "/compose", "docker-compose-linux-2.32.4-x86_64");
        req.executable = true;

        assert!(matches!(downloader.fetch(&req), DownloadOutcome::Succeeded { .. }));
        let mode = std::fs::metadata(dir.path().join(&req.filename))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_unreachable_host_fails_after_retries() {
        let dir = tempfile::tempdir().unwrap();
        let client = HttpClient::default();
        let downloader = Downloader::new(&client, dir.path(), no_wait(2));
        let req = DownloadRequest {
            url: "http://127.0.0.1:1/nothing".into(),
            filename: "nothing.tgz".into(),
            description: "nothing".into(),
            executable: false,
        };

        assert_eq!(downloader.fetch(&req), DownloadOutcome::Failed);
        assert!(leftovers(dir.path(), &[]).is_empty());
    }
}
