use std::fmt;

/// A scalar query whose single text column is a JSON document built by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarQuery {
    /// `{"ok" : true, "message" : "OK"}`
    Ping,
    /// `{"serverTime" : <epoch seconds>}`
    ServerTime,
}

impl ScalarQuery {
    /// Returns the SQL text for this query.
    pub fn sql(self) -> &'static str {
        match self {
            ScalarQuery::Ping => "SELECT json_build_object('ok', true, 'message', 'OK')::text",
            ScalarQuery::ServerTime => {
                "SELECT json_build_object('serverTime', extract(epoch from now())::integer)::text"
            }
        }
    }

    /// Returns a short name used in log fields.
    pub fn name(self) -> &'static str {
        match self {
            ScalarQuery::Ping => "ping",
            ScalarQuery::ServerTime => "server_time",
        }
    }
}

impl fmt::Display for ScalarQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
