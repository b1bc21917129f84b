#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread::{self, JoinHandle};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const BOUNDARY: &str = "----MultipartBoundary--fixture";

pub enum Encoding {
    QuotedPrintable,
    Base64,
}

pub struct Part<'a> {
    pub content_type: &'a str,
    pub encoding: Encoding,
    pub body: &'a str,
}

impl<'a> Part<'a> {
    pub fn html(body: &'a str) -> Self {
        Self {
            content_type: "text/html",
            encoding: Encoding::QuotedPrintable,
            body,
        }
    }

    pub fn css(body: &'a str) -> Self {
        Self {
            content_type: "text/css",
            encoding: Encoding::QuotedPrintable,
            body,
        }
    }
}

fn quoted_printable(body: &str) -> String {
    body.replace('=', "=3D")
}

fn base64_lines(body: &str) -> String {
    let encoded = STANDARD.encode(body.as_bytes());
    encoded
        .as_bytes()
        .chunks(76)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// Writes a browser-style `multipart/related` archive.
pub fn create_test_mhtml(path: &Path, parts: &[Part<'_>]) -> std::io::Result<()> {
    let mut archive = String::new();
    archive.push_str("From: <Saved by Blink>\r\n");
    archive.push_str("Snapshot-Content-Location: https://example.com/tables\r\n");
    archive.push_str("Subject: Tables\r\n");
    archive.push_str("MIME-Version: 1.0\r\n");
    archive.push_str(&format!(
        "Content-Type: multipart/related;\r\n\ttype=\"text/html\";\r\n\tboundary=\"{BOUNDARY}\"\r\n\r\n"
    ));

    for (index, part) in parts.iter().enumerate() {
        archive.push_str(&format!("--{BOUNDARY}\r\n"));
        archive.push_str(&format!(
            "Content-Type: {}; charset=utf-8\r\n",
            part.content_type
        ));
        let body = match part.encoding {
            Encoding::QuotedPrintable => {
                archive.push_str("Content-Transfer-Encoding: quoted-printable\r\n");
                quoted_printable(part.body)
            }
            Encoding::Base64 => {
                archive.push_str("Content-Transfer-Encoding: base64\r\n");
                base64_lines(part.body)
            }
        };
        archive.push_str(&format!(
            "Content-Location: https://example.com/part-{index}\r\n\r\n"
        ));
        archive.push_str(&body);
        archive.push_str("\r\n\r\n");
    }
    archive.push_str(&format!("--{BOUNDARY}--\r\n"));

    std::fs::write(path, archive)
}

pub fn table_html(header: &[&str], rows: &[&[&str]]) -> String {
    let mut html = String::from("<table><thead><tr>");
    for label in header {
        html.push_str(&format!("<th>{label}</th>"));
    }
    html.push_str("</tr></thead><tbody>");
    for row in rows {
        html.push_str("<tr>");
        for cell in *row {
            html.push_str(&format!("<td>{cell}</td>"));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

pub fn page(tables: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>t</title></head><body>{}</body></html>",
        tables.join("<p>between</p>")
    )
}

/// Serves exactly one HTTP response on localhost and returns its URL.
pub fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let address = listener.local_addr().expect("listener has an address");
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut request = Vec::new();
        let mut buffer = [0_u8; 1024];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            match stream.read(&mut buffer) {
                Ok(0) | Err(_) => break,
                Ok(read) => request.extend_from_slice(&buffer[..read]),
            }
        }
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
    });

    (format!("http://{address}/tables"), handle)
}
