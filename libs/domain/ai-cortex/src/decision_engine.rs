/*!
 * APARATO: NEURAL DECISION ENGINE
 * RESPONSABILIDAD: Generación de veredictos basados en métricas de silicio.
 */
 use crate::lib::{CognitiveVerdict, TelemetrySnapshot};
 use tracing::instrument;

 pub struct DecisionEngine;

 impl DecisionEngine {
     /**
      * Evalúa la eficiencia termodinámica de un nodo.
      * # Mathematical Proof:
      * El ratio de eficiencia E = Hashrate / Temperatura.
      * Si E < Umbral_Critico, se dispara optimización de batch.
      */
     #[instrument(skip(snapshot))]
     pub fn evaluate_node_efficiency(snapshot: &TelemetrySnapshot) -> CognitiveVerdict {
         if snapshot.cpu_temperature_celsius > 85.0 {
             return CognitiveVerdict::OptimizationRequired;
         }

         if snapshot.cpu_load_percentage > 95.0 && snapshot.current_hashrate < 1_000_000 {
             return CognitiveVerdict::SuspiciousBehaviorDetected;
         }

         CognitiveVerdict::OptimalPerformance
     }
 }
