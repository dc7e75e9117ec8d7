//! Geordnete Playback-Queue
//!
//! Eingehende Wire-Frames werden strikt in Ankunftsreihenfolge und
//! nacheinander abgespielt: der naechste Buffer startet erst, wenn das
//! `play`-Future des vorherigen fertig ist. Ueberlappende Wiedergabe
//! klingt hoerbar falsch.
//!
//! Beim Abbruch wird die laufende Wiedergabe verworfen und alle noch
//! wartenden Frames werden ohne Wiedergabe verworfen.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::codec::SampleBuffer;
use crate::error::{AudioError, AudioResult};

/// Senke fuer dekodierte Buffer (Lautsprecher, Datei, Test-Recorder)
#[async_trait]
pub trait PlaybackSink: Send + 'static {
    /// Spielt einen Buffer ab. Das Future endet, wenn die Wiedergabe fertig ist.
    async fn play(&mut self, buffer: SampleBuffer) -> AudioResult<()>;
}

/// Statistiken einer beendeten Queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackStatistik {
    /// Vollstaendig abgespielte Buffer
    pub abgespielt: u64,
    /// Beim Abbruch verworfene Buffer (inkl. laufender Wiedergabe)
    pub verworfen: u64,
    /// Buffer bei denen die Senke einen Fehler meldete
    pub fehler: u64,
}

/// Playback-Queue mit eigenem Tokio-Task
///
/// Lifecycle:
/// 1. `starten()` – spawnt den Wiedergabe-Task
/// 2. `einreihen()` – dekodiert und reiht Frames ein
/// 3. `abbrechen()` / `beenden()` – Teardown, Rest wird verworfen
///    oder `abschliessen()` – spielt alles Eingereihte noch ab
pub struct PlaybackQueue {
    tx: Option<mpsc::UnboundedSender<SampleBuffer>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<PlaybackStatistik>>,
    sample_rate: u32,
}

impl PlaybackQueue {
    /// Startet die Queue. Muss innerhalb einer Tokio-Runtime aufgerufen werden.
    pub fn starten<S: PlaybackSink>(sink: S, sample_rate: u32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(wiedergabe_loop(sink, rx, shutdown_rx));

        debug!(sample_rate, "Playback-Queue gestartet");

        Self {
            tx: Some(tx),
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
            sample_rate,
        }
    }

    /// Dekodiert einen Wire-Frame und reiht ihn ein.
    ///
    /// Ungueltiges Base64 wird direkt an den Aufrufer gemeldet.
    pub fn einreihen(&self, wire_frame: &str) -> AudioResult<()> {
        let tx = self.tx.as_ref().ok_or(AudioError::QueueGeschlossen)?;
        let buffer = SampleBuffer::aus_wire_frame(wire_frame, self.sample_rate)?;
        tx.send(buffer).map_err(|_| AudioError::QueueGeschlossen)
    }

    /// Reiht einen bereits dekodierten Buffer ein
    pub fn einreihen_buffer(&self, buffer: SampleBuffer) -> AudioResult<()> {
        let tx = self.tx.as_ref().ok_or(AudioError::QueueGeschlossen)?;
        tx.send(buffer).map_err(|_| AudioError::QueueGeschlossen)
    }

    /// Gibt zurueck ob noch Frames angenommen werden
    pub fn ist_aktiv(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Fordert den Teardown an (synchron, kehrt sofort zurueck)
    pub fn abbrechen(&mut self) {
        self.tx.take();
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Bricht ab und wartet auf das Ende des Wiedergabe-Tasks
    pub async fn beenden(mut self) -> AudioResult<PlaybackStatistik> {
        self.abbrechen();
        self.task_abwarten().await
    }

    /// Nimmt keine Frames mehr an, spielt aber alle eingereihten noch ab
    pub async fn abschliessen(mut self) -> AudioResult<PlaybackStatistik> {
        self.tx.take();
        // Sender muss leben bis der Task fertig ist, sonst loest das Drop den Abbruch aus
        let shutdown_tx = self.shutdown_tx.take();
        let statistik = self.task_abwarten().await;
        drop(shutdown_tx);
        statistik
    }

    async fn task_abwarten(&mut self) -> AudioResult<PlaybackStatistik> {
        match self.task.take() {
            Some(task) => task
                .await
                .map_err(|e| AudioError::Wiedergabe(format!("Playback-Task: {e}"))),
            None => Ok(PlaybackStatistik::default()),
        }
    }
}

impl Drop for PlaybackQueue {
    fn drop(&mut self) {
        self.abbrechen();
    }
}

async fn wiedergabe_loop<S: PlaybackSink>(
    mut sink: S,
    mut rx: mpsc::UnboundedReceiver<SampleBuffer>,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> PlaybackStatistik {
    let mut statistik = PlaybackStatistik::default();

    loop {
        let buffer = tokio::select! {
            biased;
            _ = &mut shutdown_rx => break,
            naechster = rx.recv() => match naechster {
                Some(buffer) => buffer,
                None => break,
            },
        };

        tokio::select! {
            biased;
            _ = &mut shutdown_rx => {
                // Laufende Wiedergabe wird abgebrochen
                statistik.verworfen += 1;
                break;
            }
            ergebnis = sink.play(buffer) => match ergebnis {
                Ok(()) => statistik.abgespielt += 1,
                Err(e) => {
                    warn!("Wiedergabe fehlgeschlagen: {}", e);
                    statistik.fehler += 1;
                }
            },
        }
    }

    rx.close();
    while rx.try_recv().is_ok() {
        statistik.verworfen += 1;
    }

    debug!(
        abgespielt = statistik.abgespielt,
        verworfen = statistik.verworfen,
        fehler = statistik.fehler,
        "Playback-Queue beendet"
    );

    statistik
}
