pub mod test_server {
    use std::sync::Once;

    /// Ensures May coroutines are configured only once per test binary.
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }
}

pub mod http {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    /// Minimal parsed HTTP response. Header names are lowercased.
    #[derive(Debug)]
    pub struct TestResponse {
        pub status: u16,
        pub headers: Vec<(String, String)>,
        pub body: String,
    }

    impl TestResponse {
        pub fn header(&self, name: &str) -> Option<&str> {
            let name = name.to_ascii_lowercase();
            self.headers
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.as_str())
        }
    }

    /// Send one request over a fresh connection and read the response.
    ///
    /// The body length comes from Content-Length, so this works against a
    /// keep-alive server without waiting for EOF.
    pub fn send_request(
        addr: SocketAddr,
        method: &str,
        path: &str,
        headers: &[(&str, &str)],
        body: Option<&str>,
    ) -> TestResponse {
        let stream = TcpStream::connect(addr).expect("connect to test server");
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("set read timeout");

        let mut request = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n");
        for (name, value) in headers {
            request.push_str(&format!("{name}: {value}\r\n"));
        }
        let body = body.unwrap_or("");
        request.push_str(&format!("Content-Length: {}\r\n\r\n{body}", body.len()));

        let mut stream = stream;
        stream
            .write_all(request.as_bytes())
            .expect("write request");

        let mut reader = BufReader::new(stream);
        let mut status_line = String::new();
        reader.read_line(&mut status_line).expect("read status line");
        let status: u16 = status_line
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| panic!("malformed status line: {status_line:?}"));

        let mut headers = Vec::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read header line");
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                let name = name.trim().to_ascii_lowercase();
                let value = value.trim().to_string();
                if name == "content-length" {
                    content_length = value.parse().unwrap_or(0);
                }
                headers.push((name, value));
            }
        }

        let mut body_bytes = vec![0u8; content_length];
        reader.read_exact(&mut body_bytes).expect("read body");
        let body = String::from_utf8_lossy(&body_bytes).to_string();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub fn get(addr: SocketAddr, path: &str) -> TestResponse {
        send_request(addr, "GET", path, &[], None)
    }

    /// POST a form-encoded body, the way a browser submits the contact form.
    pub fn post_form(addr: SocketAddr, path: &str, body: &str) -> TestResponse {
        send_request(
            addr,
            "POST",
            path,
            &[("Content-Type", "application/x-www-form-urlencoded")],
            Some(body),
        )
    }

    /// POST a JSON body, the way an API client submits.
    pub fn post_json(addr: SocketAddr, path: &str, body: &str) -> TestResponse {
        send_request(
            addr,
            "POST",
            path,
            &[("Content-Type", "application/json")],
            Some(body),
        )
    }
}
