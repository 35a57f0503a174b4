//! # Decoder de Requests HTTP/1.1
//! src/http/decoder.rs
//!
//! Convierte los bytes crudos del socket en un `Request` o en un `DecodeError`.
//!
//! ## Formato esperado
//!
//! ```text
//! GET /path?query HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! \r\n
//! ```
//!
//! ## Lectura
//!
//! Se acumulan lecturas hasta ver el terminador de headers (`\r\n\r\n` o
//! `\n\n`), hasta EOF, o hasta superar el límite de bytes. Así un request que
//! llega en varios segmentos TCP no falla de forma espuria. Lo que venga
//! después del terminador (un body) nunca se lee como parte del request.
//!
//! ## Headers
//!
//! Se parsean en orden hasta la primera línea que no tenga la forma
//! `nombre:valor` (dos puntos en una posición > 0 y al menos un carácter
//! después). Esa línea y todas las siguientes se ignoran.

use super::request::{Headers, Method, Request, UnknownMethod};
use http::uri::InvalidUri;
use http::Uri;
use std::io::{self, Read};

/// Única versión aceptada
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// Límite por defecto de bytes antes del terminador de headers
pub const DEFAULT_MAX_HEADER_BYTES: usize = 8 * 1024;

const READ_CHUNK: usize = 1024;

/// Errores que pueden ocurrir durante la decodificación
///
/// El dispatcher trata todas las variantes igual (400); la distinción solo
/// sirve para el log.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// La conexión no entregó ningún byte
    #[error("no request bytes received")]
    Empty,

    /// No apareció el terminador de headers dentro del límite
    #[error("request head exceeds {limit} bytes")]
    HeadersTooLarge { limit: usize },

    /// Error de lectura del socket
    #[error("failed to read request: {0}")]
    Io(#[from] io::Error),

    /// La request line no tiene exactamente 3 tokens
    #[error("invalid request line: {0:?}")]
    InvalidRequestLine(String),

    /// Versión distinta de HTTP/1.1
    #[error("unsupported HTTP version: {0}")]
    UnsupportedVersion(String),

    /// Método fuera del conjunto soportado
    #[error(transparent)]
    UnsupportedMethod(#[from] UnknownMethod),

    /// El target no es un URI válido
    #[error("invalid request target {target:?}: {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: InvalidUri,
    },

    /// El target no es origin-form ni absolute-form, o trae caracteres
    /// fuera de RFC 3986
    #[error("malformed request target: {0:?}")]
    MalformedTarget(String),
}

/// Lee un request del socket y lo decodifica
///
/// # Ejemplo
///
/// ```
/// use http11_server::http::decoder::decode;
///
/// let mut input: &[u8] = b"GET /testOne HTTP/1.1\r\nHost: x\r\n\r\n";
/// let request = decode(&mut input, 8192).unwrap();
///
/// assert_eq!(request.path(), "/testOne");
/// ```
pub fn decode<R: Read>(input: &mut R, max_header_bytes: usize) -> Result<Request, DecodeError> {
    let message = read_message(input, max_header_bytes)?;
    parse(&message)
}

/// Acumula bytes hasta el terminador de headers, EOF o el límite
pub fn read_message<R: Read>(input: &mut R, max_header_bytes: usize) -> Result<Vec<u8>, DecodeError> {
    let mut buffer = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let read = match input.read(&mut chunk) {
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(DecodeError::Io(e)),
        };

        // EOF: decodificamos lo que haya llegado
        if read == 0 {
            break;
        }

        // Solo buscamos el terminador en la zona nueva (más 3 bytes de solape)
        let search_from = buffer.len().saturating_sub(3);
        buffer.extend_from_slice(&chunk[..read]);

        if let Some(end) = find_head_end(&buffer, search_from) {
            if end > max_header_bytes {
                return Err(DecodeError::HeadersTooLarge {
                    limit: max_header_bytes,
                });
            }
            buffer.truncate(end);
            break;
        }

        if buffer.len() > max_header_bytes {
            return Err(DecodeError::HeadersTooLarge {
                limit: max_header_bytes,
            });
        }
    }

    if buffer.is_empty() {
        return Err(DecodeError::Empty);
    }

    Ok(buffer)
}

/// Posición justo después del primer `\r\n\r\n` o `\n\n`
fn find_head_end(buffer: &[u8], from: usize) -> Option<usize> {
    (from..buffer.len()).find_map(|i| {
        let rest = &buffer[i..];
        if rest.starts_with(b"\r\n\r\n") {
            Some(i + 4)
        } else if rest.starts_with(b"\n\n") {
            Some(i + 2)
        } else {
            None
        }
    })
}

/// Parsea un request HTTP/1.1 desde bytes
///
/// Los bytes se decodifican como texto (UTF-8 con reemplazo) y se separan en
/// líneas; el `\r` final de cada línea se descarta.
pub fn parse(bytes: &[u8]) -> Result<Request, DecodeError> {
    let text = String::from_utf8_lossy(bytes);
    let mut lines = text.lines();

    let request_line = lines.next().ok_or(DecodeError::Empty)?;
    let (method, uri, path) = parse_request_line(request_line)?;
    let headers = parse_headers(lines);

    Ok(Request::with_path(method, uri, path, headers))
}

/// Parsea la request line
///
/// Formato: `GET /path HTTP/1.1`, separado por espacios simples
fn parse_request_line(line: &str) -> Result<(Method, Uri, String), DecodeError> {
    let parts: Vec<&str> = line.split(' ').collect();

    // Debe tener exactamente 3 partes: METHOD TARGET VERSION
    let &[method, target, version] = parts.as_slice() else {
        return Err(DecodeError::InvalidRequestLine(line.to_string()));
    };

    if version != HTTP_VERSION {
        return Err(DecodeError::UnsupportedVersion(version.to_string()));
    }

    let method: Method = method.parse()?;
    let (uri, path) = parse_target(target)?;

    Ok((method, uri, path))
}

/// Parsea el request-target y extrae su path crudo
///
/// Solo se aceptan origin-form (`/path?query`) y absolute-form
/// (`http://host/path`). En absolute-form sin path el path queda vacío.
fn parse_target(target: &str) -> Result<(Uri, String), DecodeError> {
    let uri = target
        .parse::<Uri>()
        .map_err(|source| DecodeError::InvalidTarget {
            target: target.to_string(),
            source,
        })?;

    let path_and_query = if uri.scheme().is_some() {
        let after_scheme = target.split_once("://").map_or("", |(_, rest)| rest);
        let start = after_scheme
            .find(|c: char| matches!(c, '/' | '?' | '#'))
            .unwrap_or(after_scheme.len());
        &after_scheme[start..]
    } else if target.starts_with('/') {
        target
    } else {
        return Err(DecodeError::MalformedTarget(target.to_string()));
    };

    if !is_valid_path_and_query(path_and_query) {
        return Err(DecodeError::MalformedTarget(target.to_string()));
    }

    let end = path_and_query
        .find(|c: char| matches!(c, '?' | '#'))
        .unwrap_or(path_and_query.len());

    Ok((uri, path_and_query[..end].to_string()))
}

/// Path, query y fragmento usan solo pchar de RFC 3986, `/`, `?` y escapes
/// `%HH` completos; `#` puede aparecer una sola vez
fn is_valid_path_and_query(part: &str) -> bool {
    let bytes = part.as_bytes();
    let mut in_fragment = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let escape = bytes.get(i + 1..i + 3);
                if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                    return false;
                }
                i += 3;
                continue;
            }
            b'#' if !in_fragment => in_fragment = true,
            b if b.is_ascii_alphanumeric() => {}
            b'-' | b'.' | b'_' | b'~' => {}
            b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'=' => {}
            b':' | b'@' | b'/' | b'?' => {}
            _ => return false,
        }
        i += 1;
    }

    true
}

/// Parsea headers hasta la primera línea malformada
///
/// El nombre se guarda tal cual (sin normalizar mayúsculas) y el valor es
/// todo lo que sigue al primer `:`.
fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> Headers {
    let mut headers = Headers::new();

    for line in lines {
        let Some(colon) = line.find(':') else {
            break;
        };
        if colon == 0 || line.len() <= colon + 1 {
            break;
        }

        let (name, value) = (&line[..colon], &line[colon + 1..]);
        headers
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reader que entrega un byte por llamada (segmentos TCP fragmentados)
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[0];
            self.0 = &self.0[1..];
            Ok(1)
        }
    }

    /// Reader que siempre falla
    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    fn decode_bytes(raw: &[u8]) -> Result<Request, DecodeError> {
        let mut input = raw;
        decode(&mut input, DEFAULT_MAX_HEADER_BYTES)
    }

    #[test]
    fn test_decode_simple_get() {
        let request = decode_bytes(b"GET /testOne HTTP/1.1\r\n\r\n").unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.path(), "/testOne");
        assert!(request.headers().is_empty());
    }

    #[test]
    fn test_decode_every_method() {
        for method in Method::ALL {
            let raw = format!("{} /items HTTP/1.1\r\n\r\n", method);
            let request = decode_bytes(raw.as_bytes()).unwrap();
            assert_eq!(request.method(), method);
            assert_eq!(request.uri().to_string(), "/items");
        }
    }

    #[test]
    fn test_decode_query_is_not_part_of_path() {
        let request = decode_bytes(b"GET /search?q=rust&page=2 HTTP/1.1\r\n\r\n").unwrap();

        assert_eq!(request.path(), "/search");
        assert_eq!(request.query(), Some("q=rust&page=2"));
        assert_eq!(request.route_key(), "GET/search");
    }

    #[test]
    fn test_decode_keeps_raw_path() {
        let request = decode_bytes(b"GET /hello%20world/ HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.path(), "/hello%20world/");
    }

    #[test]
    fn test_decode_bare_newlines() {
        let request = decode_bytes(b"PUT /x HTTP/1.1\nHost:a\n\n").unwrap();

        assert_eq!(request.method(), Method::PUT);
        assert_eq!(request.header("Host"), Some("a"));
    }

    #[test]
    fn test_wrong_version_fails() {
        for version in ["HTTP/1.0", "HTTP/2.0", "http/1.1", "HTTP/1.1x"] {
            let raw = format!("GET /testOne {}\r\n\r\n", version);
            let result = decode_bytes(raw.as_bytes());
            assert!(
                matches!(result, Err(DecodeError::UnsupportedVersion(_))),
                "version {} should fail",
                version
            );
        }
    }

    #[test]
    fn test_unknown_method_fails() {
        for method in ["HEAD", "OPTIONS", "get", "FOO"] {
            let raw = format!("{} / HTTP/1.1\r\n\r\n", method);
            let result = decode_bytes(raw.as_bytes());
            assert!(matches!(result, Err(DecodeError::UnsupportedMethod(_))));
        }
    }

    #[test]
    fn test_malformed_target_fails() {
        let result = decode_bytes(b"GET http://[::1/path HTTP/1.1\r\n\r\n");
        assert!(matches!(result, Err(DecodeError::InvalidTarget { .. })));

        // Doble espacio: el target queda vacío
        let result = decode_bytes(b"GET  HTTP/1.1\r\n\r\n");
        assert!(matches!(result, Err(DecodeError::InvalidTarget { .. })));

        // Caracteres fuera de RFC 3986 y escapes incompletos
        for target in [
            "/a{b}", "/%zz", "/a|b", "/a^b", "/a\\b", "/a\"b", "/a<b>", "/a%2", "/a%",
        ] {
            let raw = format!("GET {} HTTP/1.1\r\n\r\n", target);
            let result = decode_bytes(raw.as_bytes());
            assert!(result.is_err(), "target {:?} should fail", target);
        }

        // Ni origin-form ni absolute-form
        for target in ["foo", "localhost:8080", "*"] {
            let raw = format!("GET {} HTTP/1.1\r\n\r\n", target);
            let result = decode_bytes(raw.as_bytes());
            assert!(result.is_err(), "target {:?} should fail", target);
        }
    }

    #[test]
    fn test_decode_accepts_rfc3986_characters() {
        let target = "/a-b._~!$&'()*+,;=:@/%2Fc?x=1&y=/z?";
        let raw = format!("GET {} HTTP/1.1\r\n\r\n", target);
        let request = decode_bytes(raw.as_bytes()).unwrap();

        assert_eq!(request.path(), "/a-b._~!$&'()*+,;=:@/%2Fc");
        assert_eq!(request.query(), Some("x=1&y=/z?"));
    }

    #[test]
    fn test_absolute_form_route_key() {
        let request = decode_bytes(b"GET http://host HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.path(), "");
        assert_eq!(request.route_key(), "GET");

        let request = decode_bytes(b"GET http://host:8080/testOne?x=1 HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.path(), "/testOne");
        assert_eq!(request.query(), Some("x=1"));
        assert_eq!(request.route_key(), "GET/testOne");
    }

    #[test]
    fn test_wrong_token_count_fails() {
        for line in ["GET", "GET /", "GET / HTTP/1.1 extra", "GET\t/\tHTTP/1.1"] {
            let raw = format!("{}\r\n\r\n", line);
            let result = decode_bytes(raw.as_bytes());
            assert!(matches!(result, Err(DecodeError::InvalidRequestLine(_))));
        }
    }

    #[test]
    fn test_no_bytes_fails() {
        let result = decode_bytes(b"");
        assert!(matches!(result, Err(DecodeError::Empty)));
    }

    #[test]
    fn test_blank_first_line_fails() {
        let result = decode_bytes(b"\r\n\r\n");
        assert!(matches!(result, Err(DecodeError::InvalidRequestLine(_))));
    }

    #[test]
    fn test_io_error_fails() {
        let result = decode(&mut Broken, DEFAULT_MAX_HEADER_BYTES);
        assert!(matches!(result, Err(DecodeError::Io(_))));
    }

    #[test]
    fn test_headers_stop_at_first_malformed_line() {
        let raw = b"GET / HTTP/1.1\r\n\
                    A: 1\r\n\
                    B: 2\r\n\
                    not a header\r\n\
                    C: 3\r\n\
                    D: 4\r\n\r\n";
        let request = decode_bytes(raw).unwrap();

        assert_eq!(request.headers().len(), 2);
        assert_eq!(request.header("A"), Some(" 1"));
        assert_eq!(request.header("B"), Some(" 2"));
        assert!(request.header("C").is_none());
        assert!(request.header("D").is_none());
    }

    #[test]
    fn test_header_with_empty_value_truncates() {
        let request = decode_bytes(b"GET / HTTP/1.1\r\nA:x\r\nEmpty:\r\nB:y\r\n\r\n").unwrap();

        assert_eq!(request.header("A"), Some("x"));
        assert!(request.header("Empty").is_none());
        assert!(request.header("B").is_none());
    }

    #[test]
    fn test_header_with_leading_colon_truncates() {
        let request = decode_bytes(b"GET / HTTP/1.1\r\n:bad\r\nB:y\r\n\r\n").unwrap();
        assert!(request.headers().is_empty());
    }

    #[test]
    fn test_header_splits_at_first_colon() {
        let request = decode_bytes(b"GET / HTTP/1.1\r\nHost:localhost:8080\r\n\r\n").unwrap();
        assert_eq!(request.header("Host"), Some("localhost:8080"));
    }

    #[test]
    fn test_repeated_headers_accumulate_in_order() {
        let raw = b"GET / HTTP/1.1\r\nAccept:a\r\nX:1\r\nAccept:b\r\nAccept:c\r\n\r\n";
        let request = decode_bytes(raw).unwrap();

        let values = request.header_values("Accept").unwrap();
        assert_eq!(values, ["a", "b", "c"]);
        assert_eq!(request.header_values("X").unwrap(), ["1"]);
    }

    #[test]
    fn test_header_names_are_case_sensitive() {
        let request = decode_bytes(b"GET / HTTP/1.1\r\nHost:a\r\nhost:b\r\n\r\n").unwrap();

        assert_eq!(request.header_values("Host").unwrap(), ["a"]);
        assert_eq!(request.header_values("host").unwrap(), ["b"]);
    }

    #[test]
    fn test_body_is_never_read() {
        let raw = b"POST /submit HTTP/1.1\r\nContent-Length: 9\r\n\r\nname:body";
        let mut input: &[u8] = raw;

        let message = read_message(&mut input, DEFAULT_MAX_HEADER_BYTES).unwrap();
        assert!(message.ends_with(b"\r\n\r\n"));

        let request = parse(&message).unwrap();
        assert_eq!(request.headers().len(), 1);
        assert!(request.header("name").is_none());
    }

    #[test]
    fn test_fragmented_input_is_accumulated() {
        let raw = b"GET /slow HTTP/1.1\r\nHost:a\r\nAccept:b\r\n\r\n";
        let request = decode(&mut Trickle(raw), DEFAULT_MAX_HEADER_BYTES).unwrap();

        assert_eq!(request.path(), "/slow");
        assert_eq!(request.header("Accept"), Some("b"));
    }

    #[test]
    fn test_eof_without_terminator_still_decodes() {
        let request = decode_bytes(b"DELETE /items HTTP/1.1").unwrap();
        assert_eq!(request.method(), Method::DELETE);
        assert_eq!(request.path(), "/items");
    }

    #[test]
    fn test_head_over_limit_fails() {
        let mut raw = b"GET / HTTP/1.1\r\n".to_vec();
        raw.extend(std::iter::repeat(b"X-Filler: aaaaaaaaaa\r\n").take(20).flatten());
        raw.extend_from_slice(b"\r\n");

        let mut input: &[u8] = &raw;
        let result = decode(&mut input, 64);
        assert!(matches!(result, Err(DecodeError::HeadersTooLarge { limit: 64 })));
    }

    #[test]
    fn test_find_head_end() {
        assert_eq!(find_head_end(b"a\r\n\r\nbody", 0), Some(5));
        assert_eq!(find_head_end(b"a\n\nbody", 0), Some(3));
        assert_eq!(find_head_end(b"a\r\nb\r\n", 0), None);
    }
}
