//! Finnhub quote client.
//!
//! One `GET /quote?symbol=S&token=K` per symbol, issued concurrently. Finnhub
//! answers unknown symbols with an all-zero quote instead of an error status,
//! so that case is reported as `NoData`.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::try_join_all;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use stock_common::{Quote, QuoteResult, Ticker};

use super::{FetchError, QuoteApi};

const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const MAX_ERROR_BODY: usize = 200;

/// Connection settings of the Finnhub client.
#[derive(Debug, Clone)]
pub struct FinnhubConfig {
    /// API root, without the trailing `/quote`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for FinnhubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Quote payload as sent by Finnhub.
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    c: f64,
    d: Option<f64>,
    dp: Option<f64>,
    h: f64,
    l: f64,
    o: f64,
    pc: f64,
    t: i64,
}

impl From<QuoteResponse> for Quote {
    fn from(r: QuoteResponse) -> Self {
        Quote {
            price: r.c,
            change: r.d,
            percent_change: r.dp,
            high: r.h,
            low: r.l,
            open: r.o,
            previous_close: r.pc,
            timestamp: r.t,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the Finnhub REST API.
#[derive(Clone)]
pub struct FinnhubClient {
    client: Client,
    base_url: String,
}

impl FinnhubClient {
    /// Creates a client with the given settings.
    pub fn new(config: FinnhubConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_one(
        &self,
        ticker: Ticker,
        credential: &str,
    ) -> Result<(Ticker, Quote), FetchError> {
        let url = format!("{}/quote", self.base_url);
        debug!("GET {} symbol={}", url, ticker);

        let symbol = ticker.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol.as_str()), ("token", credential)])
            .send()
            .await
            // The URL carries the token.
            .map_err(|e| FetchError::Network(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.without_url()))?;

        decode_quote(ticker, status, &body).map(|quote| (ticker, quote))
    }
}

#[async_trait]
impl QuoteApi for FinnhubClient {
    async fn fetch_quotes(
        &self,
        symbols: &[Ticker],
        credential: &str,
    ) -> Result<QuoteResult, FetchError> {
        let quotes = try_join_all(symbols.iter().map(|t| self.fetch_one(*t, credential))).await?;
        Ok(quotes.into_iter().collect())
    }
}

/// Turns one `/quote` response into a `Quote` or the matching error.
fn decode_quote(ticker: Ticker, status: StatusCode, body: &str) -> Result<Quote, FetchError> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(FetchError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS => return Err(FetchError::RateLimited),
        s if !s.is_success() => {
            return Err(match serde_json::from_str::<ErrorBody>(body) {
                Ok(ErrorBody { error }) => FetchError::Provider(error),
                Err(_) => FetchError::Status {
                    status,
                    body: truncate(body),
                },
            });
        }
        _ => {}
    }

    if let Ok(ErrorBody { error }) = serde_json::from_str::<ErrorBody>(body) {
        return Err(FetchError::Provider(error));
    }

    let response: QuoteResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Payload(e.to_string()))?;
    if response.c == 0.0 && response.t == 0 {
        return Err(FetchError::NoData(ticker));
    }
    Ok(response.into())
}

fn truncate(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::{Arc, Mutex};
    use std::thread;

    const AAPL_BODY: &str = concat!(
        r#"{"c":261.74,"d":-0.29,"dp":-0.1106,"h":263.31,"l":260.68,"#,
        r#""o":261.07,"pc":262.03,"t":1582641000}"#
    );
    const MSFT_BODY: &str = concat!(
        r#"{"c":410.5,"d":2.5,"dp":0.61,"h":412,"l":405,"#,
        r#""o":406,"pc":408,"t":1700000000}"#
    );

    /// Local HTTP stub: answers each request with `respond(request_line)` and
    /// records the request lines it saw.
    fn serve(respond: fn(&str) -> (u16, &'static str)) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let log = Arc::clone(&log);
                thread::spawn(move || answer(stream, respond, &log));
            }
        });
        (format!("http://{}/api/v1", addr), seen)
    }

    fn answer(
        mut stream: TcpStream,
        respond: fn(&str) -> (u16, &'static str),
        log: &Mutex<Vec<String>>,
    ) {
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut header = String::new();
            if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                break;
            }
        }
        let request_line = request_line.trim_end().to_string();
        let (status, body) = respond(&request_line);
        log.lock().unwrap().push(request_line);
        // The client may drop a connection once another symbol has failed.
        let _ = write!(
            stream,
            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
    }

    fn client(base_url: String) -> FinnhubClient {
        FinnhubClient::new(FinnhubConfig {
            base_url,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn decodes_success_payload() {
        let quote = decode_quote(Ticker::AAPL, StatusCode::OK, AAPL_BODY).unwrap();
        assert_eq!(quote.price, 261.74);
        assert_eq!(quote.change, Some(-0.29));
        assert_eq!(quote.percent_change, Some(-0.1106));
        assert_eq!(quote.previous_close, 262.03);
        assert_eq!(quote.timestamp, 1582641000);
    }

    #[test]
    fn null_change_fields_are_kept_as_none() {
        let body = r#"{"c":10.5,"d":null,"dp":null,"h":11,"l":10,"o":10,"pc":10,"t":1700000000}"#;
        let quote = decode_quote(Ticker::TSLA, StatusCode::OK, body).unwrap();
        assert_eq!(quote.change, None);
        assert_eq!(quote.percent_change, None);
    }

    #[test]
    fn zero_quote_means_no_data() {
        let body = r#"{"c":0,"d":null,"dp":null,"h":0,"l":0,"o":0,"pc":0,"t":0}"#;
        let err = decode_quote(Ticker::META, StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, FetchError::NoData(Ticker::META)));
    }

    #[test]
    fn status_codes_map_to_errors() {
        let body = r#"{"error":"Invalid API key."}"#;
        assert!(matches!(
            decode_quote(Ticker::AAPL, StatusCode::UNAUTHORIZED, body),
            Err(FetchError::Unauthorized)
        ));
        assert!(matches!(
            decode_quote(Ticker::AAPL, StatusCode::TOO_MANY_REQUESTS, ""),
            Err(FetchError::RateLimited)
        ));
        assert!(matches!(
            decode_quote(Ticker::AAPL, StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            Err(FetchError::Status { status: StatusCode::BAD_GATEWAY, .. })
        ));
    }

    #[test]
    fn provider_error_body_is_surfaced() {
        let err = decode_quote(
            Ticker::AAPL,
            StatusCode::OK,
            r#"{"error":"You don't have access to this resource."}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "You don't have access to this resource.");

        let err = decode_quote(
            Ticker::AAPL,
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"Internal error"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::Provider(ref m) if m == "Internal error"));
    }

    #[test]
    fn garbage_body_is_payload_error() {
        let err = decode_quote(Ticker::AAPL, StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, FetchError::Payload(_)));
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(500);
        let short = truncate(&body);
        assert_eq!(short.len(), MAX_ERROR_BODY + 3);
        assert!(short.ends_with("..."));
    }

    #[tokio::test]
    async fn fetches_every_symbol_with_the_token() {
        let (base_url, seen) = serve(|line| {
            if line.contains("symbol=AAPL") {
                (200, AAPL_BODY)
            } else {
                (200, MSFT_BODY)
            }
        });
        let quotes = client(base_url)
            .fetch_quotes(&[Ticker::AAPL, Ticker::MSFT], "tok")
            .await
            .unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[&Ticker::AAPL].price, 261.74);
        assert_eq!(quotes[&Ticker::MSFT].price, 410.5);
        let mut lines = seen.lock().unwrap().clone();
        lines.sort();
        assert_eq!(
            lines,
            vec![
                "GET /api/v1/quote?symbol=AAPL&token=tok HTTP/1.1",
                "GET /api/v1/quote?symbol=MSFT&token=tok HTTP/1.1",
            ]
        );
    }

    #[tokio::test]
    async fn one_failed_symbol_fails_the_whole_fetch() {
        let (base_url, _) = serve(|line| {
            if line.contains("symbol=MSFT") {
                (200, r#"{"error":"bad"}"#)
            } else {
                (200, AAPL_BODY)
            }
        });
        let err = client(base_url)
            .fetch_quotes(&[Ticker::AAPL, Ticker::MSFT], "tok")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Provider(ref m) if m == "bad"));
    }

    #[tokio::test]
    async fn trailing_slash_base_url_reaches_quote_endpoint() {
        let (base_url, seen) = serve(|_| (200, AAPL_BODY));
        let quotes = client(format!("{}/", base_url))
            .fetch_quotes(&[Ticker::AAPL], "tok")
            .await
            .unwrap();
        assert!(quotes.contains_key(&Ticker::AAPL));
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            ["GET /api/v1/quote?symbol=AAPL&token=tok HTTP/1.1"]
        );
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = FinnhubClient::new(FinnhubConfig {
            base_url: "http://localhost:9000/api/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:9000/api/v1");
    }
}
