/*!
 * APARATO: OPTIMIZATION CONTROLLER
 * RESPONSABILIDAD: Traducción de veredictos en directivas de mando.
 */
 use crate::lib::{CognitiveVerdict, OptimizationDirective};

 pub struct OptimizationController;

 impl OptimizationController {
     pub fn generate_directive(worker_id: &str, verdict: &CognitiveVerdict) -> Option<OptimizationDirective> {
         match verdict {
             CognitiveVerdict::OptimizationRequired => Some(OptimizationDirective {
                 target_worker_identifier: Some(worker_id.to_string()),
                 recommended_batch_size: 512, // Reducción de carga para enfriamiento
                 suggest_pacing_delay_milliseconds: 500,
                 reasoning_metadata: "THERMAL_THROTTLE_PREVENTION".to_string(),
             }),
             _ => None
         }
     }
 }
