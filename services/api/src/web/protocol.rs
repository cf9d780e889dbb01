//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the practice client and
//! the API server for one speaking-practice connection.

use coach_core::domain::AnalysisStatus;
use serde::{Deserialize, Serialize};

//=========================================================================================
// Messages Sent FROM the Client TO the Server
//=========================================================================================
// NOTE: The user's recorded audio is sent as raw Binary frames between
// `recording_started` and `recording_ended`, not as part of this enum.
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// The user tapped the mic: a new utterance begins. Binary audio frames
    /// follow until `recording_ended`.
    RecordingStarted,

    /// The user stopped the recording; the buffered audio should now be
    /// transcribed and evaluated.
    RecordingEnded,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client
//=========================================================================================
// NOTE: The coach's spoken reply is sent as raw Binary frames between
// `speaking_started` and `speaking_ended`. These messages provide context
// for that audio.
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once after the connection is accepted. Carries the current
    /// points so the client can render the header immediately.
    Ready { points: i64 },

    /// Capture of a new utterance has begun; the UI shows "Listening...".
    CaptureStarted,

    /// Capture finished; the buffered audio is being processed.
    CaptureEnded,

    /// Capture produced nothing usable. The recording and processing flags
    /// clear; no points change and no mistake is recorded.
    CaptureError { message: String },

    /// The utterance is being evaluated; the UI shows "Thinking...".
    Processing,

    /// The final transcript for the current utterance.
    Transcript { text: String },

    /// The scored outcome of the utterance: banner text and the new total.
    Verdict {
        status: AnalysisStatus,
        banner: String,
        points: i64,
    },

    /// The coach has started speaking; reply audio follows as Binary frames.
    SpeakingStarted,

    /// The coach finished speaking.
    SpeakingEnded,

    /// Reports a fatal error to the client, which should display an error message.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_parse_from_tagged_json() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"recording_started"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::RecordingStarted));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"recording_ended"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::RecordingEnded));
    }

    #[test]
    fn verdict_serializes_with_wire_status_names() {
        let msg = ServerMessage::Verdict {
            status: AnalysisStatus::WrongLanguage,
            banner: "-10 Try English only".to_string(),
            points: 990,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"verdict\""));
        assert!(json.contains("\"status\":\"wrong_language\""));
        assert!(json.contains("\"points\":990"));
    }

    #[test]
    fn unknown_client_message_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"pause"}"#).is_err());
    }
}
