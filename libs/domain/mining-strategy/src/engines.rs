/*!
 * =================================================================
 * APARATO: ENGINES MODULE HUB (V15.0 - ANDROID SYNCED)
 * CLASIFICACIÓN: DOMAIN STRATEGY (ESTRATO L2)
 * RESPONSABILIDAD: EXPOSICIÓN DE MOTORES DE BÚSQUEDA ESPECIALIZADOS
 * =================================================================
 */

/// Motor de búsqueda basado en diccionarios de alta velocidad (Brainwallets).
pub mod dictionary_engine;

/// Motor de arqueología forense para patrones históricos (Debian/Android).
pub mod forensic_engine;

/// Motor de simulación de entropía de Windows XP (Satoshi Era).
pub mod satoshi_xp_engine;

/// Motor de búsqueda secuencial optimizado con aritmética proyectiva y AVX2.
pub mod sequential_engine;

/// Motor de arqueología para la vulnerabilidad LCG de Android (CVE-2013-7372).
/// ✅ RESOLUCIÓN E0432: Módulo registrado formalmente.
pub mod android_lcg_engine;
