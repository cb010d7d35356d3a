//! Upstream payloads served by the mock server.

#![allow(dead_code)]

pub const ENGINE_BODY: &[u8] = b"engine archive 27.4.1";
pub const ROOTLESS_BODY: &[u8] = b"rootless extras archive 27.4.1";
pub const COMPOSE_BODY: &[u8] = b"#!compose 2.32.4";

/// Static directory listing for x86_64. 27.4.1 is the newest engine.
pub const X86_64_LISTING: &str = r#"<html>
<head><title>Index of linux/static/stable/x86_64/</title></head>
<body>
<a href="../">../</a>
<a href="docker-26.1.4.tgz">docker-26.1.4.tgz</a>
<a href="docker-27.3.0.tgz">docker-27.3.0.tgz</a>
<a href="docker-27.4.1.tgz">docker-27.4.1.tgz</a>
<a href="docker-rootless-extras-27.3.0.tgz">docker-rootless-extras-27.3.0.tgz</a>
<a href="docker-rootless-extras-27.4.1.tgz">docker-rootless-extras-27.4.1.tgz</a>
</body>
</html>
"#;
