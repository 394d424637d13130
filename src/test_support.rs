use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

/// Serve a single canned HTTP response on an ephemeral local port and return
/// the base URL. The listener thread reads one request, writes the response
/// and exits; a second connection attempt will simply fail.
pub(crate) fn serve_once(status: &'static str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut request = [0u8; 8192];
            let _ = stream.read(&mut request);

            let header = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(&body);
        }
    });

    format!("http://{}", addr)
}
