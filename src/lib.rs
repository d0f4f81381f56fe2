//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# ctxlog

ctxlog is a structured, context-aware logging core for service processes.

# The problem

A request passes through many functions before something worth logging
happens. By then the things that make the log line useful (the request id, the
user, the order being processed) were learned far up the call graph, and
threading them through every signature is not an option.

ctxlog lets call sites attach key/value pairs to a [`Context`] as they learn
them. Every record logged with that context carries the accumulated pairs.

# Contexts

```rust
use ctxlog::{Context, Strategy};

let mut ctx = Context::new_tracked(Strategy::Ordered);
ctx.annotate("user", "alice");
let ctx = ctx.with_value("order", 1042u64);
assert_eq!(ctx.values().len(), 4); // reqId, traId, user, order
```

The pairs live in a [`KeyValueLog`](values::KeyValueLog) chosen by
[`Strategy`]:

| strategy   | storage                         | clones           | snapshot order  |
|------------|---------------------------------|------------------|-----------------|
| `Ordered`  | `Vec`, no locking               | deep copies      | first insertion |
| `Locked`   | `HashMap` behind an `RwLock`    | share storage    | unspecified     |
| `LockFree` | concurrent skip list            | share storage    | key order       |

Every log holds at most [`values::CAPACITY`] keys. Use [`Context::fork`] to
give a concurrently running task its own copy.

# Routing

Records are split into three bands by level:

| band   | levels                          | file         | console |
|--------|---------------------------------|--------------|---------|
| debug  | `debug`                         | `debug.log`  | stdout  |
| output | `info`, `warn`                  | `output.log` | stdout  |
| error  | `error`, `dpanic`, `panic`, `fatal` | `error.log` | stderr |

File sinks write JSON lines and rotate by size, each band with its own
[`RotationPolicy`].

# Logging

```rust
use ctxlog::{Context, LogConfig, LogCore};

let dir = tempfile::tempdir().unwrap();
let core = LogCore::global();
core.init(LogConfig {
    dir: dir.path().to_path_buf(),
    file: true,
    console: false,
    ..Default::default()
})
.unwrap();

let ctx = Context::default().with_value("req", "r1");
core.info(Some(&ctx), "hello");
ctxlog::error!(ctx: &ctx, "lookup failed for {}", "r1"; "attempts" => 3);
core.close();
```

Logging never fails the caller. Write and rotation errors are reported on
stderr; before [`LogCore::init`] and after [`LogCore::close`] records are
printed to stderr in a minimal form.
*/

mod config;
pub mod context;
pub mod encoder;
mod error;
pub mod fallback;
mod host;
mod level;
mod log_core;
mod log_record;
mod macros;
pub mod router;
pub mod sink;
mod sublogger;
mod value;
pub mod values;

pub use config::{LogConfig, RotateConfig, RotationPolicy};
pub use context::{ApplyContext, Context};
pub use error::{Error, Result};
pub use level::{Band, DEBUG_THRESHOLD, ERROR_THRESHOLD, Level};
pub use log_core::LogCore;
pub use log_record::LogRecord;
pub use router::{Router, RouterBuilder};
pub use sink::Sink;
pub use sublogger::SubLogger;
pub use value::Value;
pub use values::Strategy;
